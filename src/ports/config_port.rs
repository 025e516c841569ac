//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// Required string value; missing or blank keys are an error.
    fn require_string(
        &self,
        section: &str,
        key: &str,
    ) -> Result<String, crate::domain::error::AnalyzerError> {
        match self.get_string(section, key) {
            Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            _ => Err(crate::domain::error::AnalyzerError::ConfigMissing {
                section: section.to_string(),
                key: key.to_string(),
            }),
        }
    }
}
