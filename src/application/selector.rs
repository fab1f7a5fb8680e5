use tracing::{debug, warn};

use crate::domain::{metrics, CommandKind, Datastore, HostSystem, ManagedObject, ObjectKind, Resource};

use super::CheckError;

/// Resource the check is judged on, plus every resource that was evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub selected: Resource,
    pub resources: Vec<Resource>,
}

impl Selection {
    fn single(resource: Resource) -> Self {
        Self {
            selected: resource.clone(),
            resources: vec![resource],
        }
    }
}

fn is_named(object: &ManagedObject, name: &str) -> bool {
    object.get("name") == Some(name)
}

/// First datastore whose name matches exactly
pub fn select_datastore(objects: &[ManagedObject], name: &str) -> Result<Selection, CheckError> {
    let object = objects
        .iter()
        .find(|o| is_named(o, name))
        .ok_or_else(|| CheckError::NotFound {
            kind: ObjectKind::Datastore,
            name: name.to_string(),
        })?;

    let datastore = Datastore::try_from(object)?;
    Ok(Selection::single(metrics::datastore_resource(&datastore)))
}

/// Host level resource for CPU and MEM.
///
/// With a name filter the matching host is used. Without one every host is
/// evaluated and the one with the least free capacity is selected; an undefined
/// percentage counts as the worst. Ties keep enumeration order. Hosts whose
/// record cannot be decoded are skipped unless none can be.
pub fn select_host(
    objects: &[ManagedObject],
    command: CommandKind,
    filter: Option<&str>,
) -> Result<Selection, CheckError> {
    if let Some(name) = filter {
        let object = objects
            .iter()
            .find(|o| is_named(o, name))
            .ok_or_else(|| CheckError::NotFound {
                kind: ObjectKind::HostSystem,
                name: name.to_string(),
            })?;
        return host_resource(object, command).map(Selection::single);
    }

    let mut resources = Vec::with_capacity(objects.len());
    let mut skipped = None;
    for object in objects {
        match host_resource(object, command) {
            Ok(resource) => resources.push(resource),
            Err(CheckError::InvalidRecord(e)) => {
                warn!("Skipping host {}: {}", object.reference, e);
                if skipped.is_none() {
                    skipped = Some(e);
                }
            }
            Err(e) => return Err(e),
        }
    }
    if resources.is_empty() {
        if let Some(e) = skipped {
            return Err(e.into());
        }
    }

    let mut worst: Option<&Resource> = None;
    for resource in &resources {
        let free = resource.free_percent().unwrap_or(f64::NEG_INFINITY);
        match worst {
            Some(current) if current.free_percent().unwrap_or(f64::NEG_INFINITY) <= free => {}
            _ => worst = Some(resource),
        }
    }

    let selected = worst
        .cloned()
        .ok_or(CheckError::NoObjects(ObjectKind::HostSystem))?;
    debug!("Selected host {} out of {}", selected.name, resources.len());

    Ok(Selection {
        selected,
        resources,
    })
}

fn host_resource(object: &ManagedObject, command: CommandKind) -> Result<Resource, CheckError> {
    let host = HostSystem::try_from(object)?;
    metrics::host_resource(command, &host).ok_or(CheckError::NotHostCommand(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datastore(reference: &str, name: &str, capacity: i64, free: i64) -> ManagedObject {
        ManagedObject::new(reference)
            .with_property(Datastore::NAME, name)
            .with_property(Datastore::CAPACITY, capacity.to_string())
            .with_property(Datastore::FREE_SPACE, free.to_string())
    }

    fn host(name: &str, usage_mhz: i64) -> ManagedObject {
        ManagedObject::new(format!("host-{}", name))
            .with_property(HostSystem::NAME, name)
            .with_property(HostSystem::CPU_MHZ, "2000")
            .with_property(HostSystem::NUM_CPU_CORES, "4")
            .with_property(HostSystem::MEMORY_SIZE, "8589934592")
            .with_property(HostSystem::OVERALL_CPU_USAGE, usage_mhz.to_string())
            .with_property(HostSystem::OVERALL_MEMORY_USAGE, "1024")
    }

    #[test]
    fn test_select_datastore_by_name() {
        let objects = vec![
            datastore("datastore-1", "ds1", 1000, 900),
            datastore("datastore-2", "ds2", 2000, 500),
        ];

        let selection = select_datastore(&objects, "ds2").unwrap();
        assert_eq!(selection.selected, Resource::new("ds2", 2000.0, 500.0));
        assert_eq!(selection.resources.len(), 1);
    }

    #[test]
    fn test_select_datastore_first_match_wins() {
        let objects = vec![
            datastore("datastore-1", "ds1", 1000, 100),
            datastore("datastore-2", "ds1", 4000, 4000),
        ];

        let selection = select_datastore(&objects, "ds1").unwrap();
        assert_eq!(selection.selected.total, 1000.0);
    }

    #[test]
    fn test_select_datastore_ignores_broken_non_matching_records() {
        let objects = vec![
            ManagedObject::new("datastore-0").with_property(Datastore::NAME, "offline"),
            datastore("datastore-2", "ds2", 2000, 500),
        ];

        assert!(select_datastore(&objects, "ds2").is_ok());
    }

    #[test]
    fn test_select_datastore_not_found() {
        let objects = vec![datastore("datastore-1", "ds1", 1000, 900)];

        let err = select_datastore(&objects, "DS1").unwrap_err();
        assert!(matches!(err, CheckError::NotFound { kind: ObjectKind::Datastore, .. }));
        assert!(matches!(select_datastore(&[], "ds1"), Err(CheckError::NotFound { .. })));
    }

    #[test]
    fn test_select_host_without_filter_picks_least_free() {
        let objects = vec![host("esx1", 1000), host("esx2", 6000), host("esx3", 2000)];

        let selection = select_host(&objects, CommandKind::Cpu, None).unwrap();
        assert_eq!(selection.selected.name, "esx2");
        assert_eq!(selection.selected.free, 2000.0);
        assert_eq!(selection.resources.len(), 3);
    }

    #[test]
    fn test_select_host_ties_keep_enumeration_order() {
        let objects = vec![host("esx1", 4000), host("esx2", 4000)];

        let selection = select_host(&objects, CommandKind::Cpu, None).unwrap();
        assert_eq!(selection.selected.name, "esx1");
    }

    #[test]
    fn test_select_host_with_filter() {
        let objects = vec![host("esx1", 1000), host("esx2", 6000)];

        let selection = select_host(&objects, CommandKind::Mem, Some("esx1")).unwrap();
        assert_eq!(selection.selected, Resource::new("esx1", 8192.0, 7168.0));
        assert_eq!(selection.resources.len(), 1);

        let err = select_host(&objects, CommandKind::Mem, Some("esx9")).unwrap_err();
        assert!(matches!(err, CheckError::NotFound { kind: ObjectKind::HostSystem, .. }));
    }

    #[test]
    fn test_select_host_empty_inventory() {
        let err = select_host(&[], CommandKind::Cpu, None).unwrap_err();
        assert!(matches!(err, CheckError::NoObjects(ObjectKind::HostSystem)));
    }

    #[test]
    fn test_select_host_skips_incomplete_records() {
        let disconnected = ManagedObject::new("host-esx2")
            .with_property(HostSystem::NAME, "esx2")
            .with_property(HostSystem::CPU_MHZ, "2000")
            .with_property(HostSystem::NUM_CPU_CORES, "4")
            .with_property(HostSystem::MEMORY_SIZE, "8589934592");
        let objects = vec![host("esx1", 1000), disconnected];

        let selection = select_host(&objects, CommandKind::Cpu, None).unwrap();
        assert_eq!(selection.selected.name, "esx1");
        assert_eq!(selection.resources, vec![Resource::new("esx1", 8000.0, 7000.0)]);
    }

    #[test]
    fn test_select_host_fails_when_no_record_decodes() {
        let objects = vec![
            ManagedObject::new("host-1").with_property(HostSystem::NAME, "esx1"),
            ManagedObject::new("host-2").with_property(HostSystem::NAME, "esx2"),
        ];

        let err = select_host(&objects, CommandKind::Cpu, None).unwrap_err();
        assert!(matches!(err, CheckError::InvalidRecord(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_select_host_with_filter_reports_incomplete_record() {
        let objects = vec![host("esx1", 1000), ManagedObject::new("host-2").with_property(HostSystem::NAME, "esx2")];

        let err = select_host(&objects, CommandKind::Cpu, Some("esx2")).unwrap_err();
        assert!(matches!(err, CheckError::InvalidRecord(_)));
    }

    #[test]
    fn test_select_host_rejects_datastore_command() {
        let err = select_host(&[host("esx1", 1000)], CommandKind::Vmfs, None).unwrap_err();
        assert!(matches!(err, CheckError::NotHostCommand(CommandKind::Vmfs)));
    }
}
