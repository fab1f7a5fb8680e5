use std::collections::BTreeMap;

use thiserror::Error;

use super::ObjectKind;

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("{kind} {reference}: missing property {property}")]
    MissingProperty {
        kind: ObjectKind,
        reference: String,
        property: &'static str,
    },

    #[error("{kind} {reference}: invalid value {value:?} for {property}")]
    InvalidValue {
        kind: ObjectKind,
        reference: String,
        property: &'static str,
        value: String,
    },
}

/// Untyped inventory record as returned by an enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedObject {
    /// Managed object reference value, e.g. `host-42` or `datastore-17`
    pub reference: String,
    pub properties: BTreeMap<String, String>,
}

impl ManagedObject {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(path.into(), value.into());
        self
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.properties.get(path).map(String::as_str)
    }

    fn require(&self, kind: ObjectKind, property: &'static str) -> Result<&str, RecordError> {
        self.get(property).ok_or_else(|| RecordError::MissingProperty {
            kind,
            reference: self.reference.clone(),
            property,
        })
    }

    fn require_i64(&self, kind: ObjectKind, property: &'static str) -> Result<i64, RecordError> {
        let value = self.require(kind, property)?;
        value.trim().parse().map_err(|_| RecordError::InvalidValue {
            kind,
            reference: self.reference.clone(),
            property,
            value: value.to_string(),
        })
    }
}

/// Host system summary fields needed for the CPU and MEM checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSystem {
    pub name: String,
    pub cpu_mhz: i64,
    pub num_cpu_cores: i64,
    /// Physical memory in bytes
    pub memory_size: i64,
    /// Current CPU usage in MHz
    pub overall_cpu_usage: i64,
    /// Current memory usage in MB
    pub overall_memory_usage: i64,
}

impl HostSystem {
    pub const NAME: &'static str = "name";
    pub const CPU_MHZ: &'static str = "summary.hardware.cpuMhz";
    pub const NUM_CPU_CORES: &'static str = "summary.hardware.numCpuCores";
    pub const MEMORY_SIZE: &'static str = "summary.hardware.memorySize";
    pub const OVERALL_CPU_USAGE: &'static str = "summary.quickStats.overallCpuUsage";
    pub const OVERALL_MEMORY_USAGE: &'static str = "summary.quickStats.overallMemoryUsage";

    /// Property paths retrieved for every host system
    pub const PROPERTIES: [&'static str; 6] = [
        Self::NAME,
        Self::CPU_MHZ,
        Self::NUM_CPU_CORES,
        Self::MEMORY_SIZE,
        Self::OVERALL_CPU_USAGE,
        Self::OVERALL_MEMORY_USAGE,
    ];
}

impl TryFrom<&ManagedObject> for HostSystem {
    type Error = RecordError;

    fn try_from(object: &ManagedObject) -> Result<Self, Self::Error> {
        let kind = ObjectKind::HostSystem;
        Ok(Self {
            name: object.require(kind, Self::NAME)?.to_string(),
            cpu_mhz: object.require_i64(kind, Self::CPU_MHZ)?,
            num_cpu_cores: object.require_i64(kind, Self::NUM_CPU_CORES)?,
            memory_size: object.require_i64(kind, Self::MEMORY_SIZE)?,
            overall_cpu_usage: object.require_i64(kind, Self::OVERALL_CPU_USAGE)?,
            overall_memory_usage: object.require_i64(kind, Self::OVERALL_MEMORY_USAGE)?,
        })
    }
}

/// Datastore summary fields needed for the VMFS check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datastore {
    pub name: String,
    /// Capacity in bytes
    pub capacity: i64,
    /// Free space in bytes
    pub free_space: i64,
}

impl Datastore {
    pub const NAME: &'static str = "name";
    pub const CAPACITY: &'static str = "summary.capacity";
    pub const FREE_SPACE: &'static str = "summary.freeSpace";

    pub const PROPERTIES: [&'static str; 3] = [Self::NAME, Self::CAPACITY, Self::FREE_SPACE];
}

impl TryFrom<&ManagedObject> for Datastore {
    type Error = RecordError;

    fn try_from(object: &ManagedObject) -> Result<Self, Self::Error> {
        let kind = ObjectKind::Datastore;
        Ok(Self {
            name: object.require(kind, Self::NAME)?.to_string(),
            capacity: object.require_i64(kind, Self::CAPACITY)?,
            free_space: object.require_i64(kind, Self::FREE_SPACE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_host_system() {
        let object = ManagedObject::new("host-1")
            .with_property(HostSystem::NAME, "esx1.lab")
            .with_property(HostSystem::CPU_MHZ, "2000")
            .with_property(HostSystem::NUM_CPU_CORES, "4")
            .with_property(HostSystem::MEMORY_SIZE, "17179869184")
            .with_property(HostSystem::OVERALL_CPU_USAGE, "3000")
            .with_property(HostSystem::OVERALL_MEMORY_USAGE, "4096");

        let host = HostSystem::try_from(&object).unwrap();
        assert_eq!(host.name, "esx1.lab");
        assert_eq!(host.num_cpu_cores, 4);
        assert_eq!(host.memory_size, 17_179_869_184);
    }

    #[test]
    fn test_decode_reports_missing_property() {
        let object = ManagedObject::new("datastore-9").with_property(Datastore::NAME, "ds1");

        let err = Datastore::try_from(&object).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingProperty {
                kind: ObjectKind::Datastore,
                reference: "datastore-9".to_string(),
                property: Datastore::CAPACITY,
            }
        );
    }

    #[test]
    fn test_decode_reports_invalid_number() {
        let object = ManagedObject::new("datastore-9")
            .with_property(Datastore::NAME, "ds1")
            .with_property(Datastore::CAPACITY, "lots")
            .with_property(Datastore::FREE_SPACE, "1");

        let err = Datastore::try_from(&object).unwrap_err();
        assert!(matches!(err, RecordError::InvalidValue { property: "summary.capacity", .. }));
    }
}
