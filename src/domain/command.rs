use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Kind of check requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandKind {
    Cpu,
    Mem,
    Vmfs,
}

impl CommandKind {
    pub const ALL: [CommandKind; 3] = [Self::Cpu, Self::Mem, Self::Vmfs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Mem => "MEM",
            Self::Vmfs => "VMFS",
        }
    }

    /// Inventory object kind that has to be enumerated for this command
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::Cpu | Self::Mem => ObjectKind::HostSystem,
            Self::Vmfs => ObjectKind::Datastore,
        }
    }

    /// Comma separated list of the accepted command names
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a command name is not one of [`CommandKind::ALL`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl FromStr for CommandKind {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CPU" => Ok(Self::Cpu),
            "MEM" => Ok(Self::Mem),
            "VMFS" => Ok(Self::Vmfs),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

/// Managed object type as named by the vSphere inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    HostSystem,
    Datastore,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HostSystem => "HostSystem",
            Self::Datastore => "Datastore",
        }
    }

    /// Lowercase label used in plugin output
    pub fn label(&self) -> &'static str {
        match self {
            Self::HostSystem => "host",
            Self::Datastore => "datastore",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
