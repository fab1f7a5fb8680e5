use super::{CommandKind, Datastore, HostSystem, Resource};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// CPU capacity of a host in MHz
pub fn cpu_resource(host: &HostSystem) -> Resource {
    let total = host.cpu_mhz as f64 * host.num_cpu_cores as f64;
    let free = total - host.overall_cpu_usage as f64;
    Resource::new(host.name.clone(), total, free)
}

/// Memory of a host in MB
pub fn memory_resource(host: &HostSystem) -> Resource {
    let total = host.memory_size as f64 / BYTES_PER_MB;
    let free = total - host.overall_memory_usage as f64;
    Resource::new(host.name.clone(), total, free)
}

/// Space of a datastore in bytes
pub fn datastore_resource(datastore: &Datastore) -> Resource {
    Resource::new(
        datastore.name.clone(),
        datastore.capacity as f64,
        datastore.free_space as f64,
    )
}

/// Host resource matching a host level command, `None` for VMFS
pub fn host_resource(command: CommandKind, host: &HostSystem) -> Option<Resource> {
    match command {
        CommandKind::Cpu => Some(cpu_resource(host)),
        CommandKind::Mem => Some(memory_resource(host)),
        CommandKind::Vmfs => None,
    }
}
