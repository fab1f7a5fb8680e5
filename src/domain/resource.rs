/// One measured entity: a host's CPU capacity, a host's memory or a datastore's space
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    pub total: f64,
    pub free: f64,
}

impl Resource {
    pub fn new(name: impl Into<String>, total: f64, free: f64) -> Self {
        Self {
            name: name.into(),
            total,
            free,
        }
    }

    /// Free share of the total in percent, `None` when the total is zero
    pub fn free_percent(&self) -> Option<f64> {
        if self.total == 0.0 {
            return None;
        }
        Some(self.free / self.total * 100.0)
    }

    /// Free percentage with two decimals, `"undefined"` when the total is zero
    pub fn free_percent_display(&self) -> String {
        match self.free_percent() {
            Some(percent) => format!("{:.2}", percent),
            None => "undefined".to_string(),
        }
    }
}
