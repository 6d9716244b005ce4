//! Configuration access port trait.

use crate::domain::error::FoliotrackError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// A key with no sensible default, e.g. the vendor API key.
    fn require_string(&self, section: &str, key: &str) -> Result<String, FoliotrackError> {
        self.get_string(section, key)
            .ok_or_else(|| FoliotrackError::ConfigMissing {
                section: section.into(),
                key: key.into(),
            })
    }
}
