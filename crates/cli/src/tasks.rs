//! Static task table.
//!
//! Responsibilities:
//! - Describe every task the dispatcher knows: name, description, required
//!   environment variables and what it launches.
//! - Exact-match lookup by name and rendering of the usage banner.
//!
//! Does NOT handle:
//! - Running tasks (see `commands`).
//!
//! Invariants:
//! - The table is constant for the lifetime of the process.
//! - Names are unique and matched case-sensitively.

use ftrack_services_config::ConfigSet;
use ftrack_services_config::constants::{
    API_KEY_VAR, LEECHER_ENTRY_POINT, PROCESSOR_ENTRY_POINT, SERVER_URL_VAR,
};

use crate::error::TaskError;

/// What a task does once its preconditions hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// Print the usage banner.
    Banner,
    /// Install requirements into the virtual environment.
    Install,
    /// Run a service entry point inside the virtual environment.
    Service { entry_point: &'static str },
    /// Build the addon server package.
    Package,
}

/// A named, fixed task record.
#[derive(Debug, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub required_env: &'static [&'static str],
    pub launch: Launch,
}

const SERVICE_ENV: &[&str] = &[SERVER_URL_VAR, API_KEY_VAR];

pub static HELP: TaskDescriptor = TaskDescriptor {
    name: "help",
    description: "Print this help",
    required_env: &[],
    launch: Launch::Banner,
};

pub static DEFAULT: TaskDescriptor = TaskDescriptor {
    name: "default",
    description: "Same as help",
    required_env: &[],
    launch: Launch::Banner,
};

pub static INSTALL: TaskDescriptor = TaskDescriptor {
    name: "install",
    description: "Install service dependencies into the virtual environment",
    required_env: &[],
    launch: Launch::Install,
};

pub static LEECHER: TaskDescriptor = TaskDescriptor {
    name: "leecher",
    description: "Start the leecher of ftrack events",
    required_env: SERVICE_ENV,
    launch: Launch::Service {
        entry_point: LEECHER_ENTRY_POINT,
    },
};

pub static PROCESSOR: TaskDescriptor = TaskDescriptor {
    name: "processor",
    description: "Start the processor of leeched events",
    required_env: SERVICE_ENV,
    launch: Launch::Service {
        entry_point: PROCESSOR_ENTRY_POINT,
    },
};

pub static PACKAGE: TaskDescriptor = TaskDescriptor {
    name: "package",
    description: "Build the addon server package",
    required_env: &[],
    launch: Launch::Package,
};

/// All tasks, in banner order.
pub static TASKS: [&TaskDescriptor; 6] = [&HELP, &DEFAULT, &INSTALL, &LEECHER, &PROCESSOR, &PACKAGE];

/// Look up a task by exact name.
///
/// The binary resolves tasks through clap; this lookup backs the table checks.
#[cfg(test)]
pub fn find(name: &str) -> Option<&'static TaskDescriptor> {
    TASKS.iter().copied().find(|task| task.name == name)
}

/// Comma-separated task names, for error messages.
pub fn task_names() -> String {
    TASKS.iter().map(|t| t.name).collect::<Vec<_>>().join(", ")
}

/// Error for a task name that is not in the table.
pub fn unknown_task(name: impl Into<String>) -> TaskError {
    TaskError::UnknownTask {
        name: name.into(),
        available: task_names(),
    }
}

impl TaskDescriptor {
    /// Fail with the first required variable that is unset or blank.
    pub fn check_required_env(&self, env: &ConfigSet) -> Result<(), TaskError> {
        match self
            .required_env
            .iter()
            .find(|var| env.get_non_empty(var).is_none())
        {
            Some(var) => Err(TaskError::MissingEnv {
                task: self.name,
                var: *var,
            }),
            None => Ok(()),
        }
    }
}

/// Static usage banner.
pub fn banner() -> String {
    let width = TASKS.iter().map(|t| t.name.len()).max().unwrap_or(0);
    let mut out = String::from("ftrack addon services\n\nUsage: ftrack-services <TASK>\n\nTasks:\n");
    for task in TASKS {
        out.push_str(&format!(
            "  {:width$}  {}\n",
            task.name,
            task.description,
            width = width
        ));
    }
    out.push_str(&format!(
        "\nThe leecher and processor require {} to be set (environment or .env).\n",
        SERVICE_ENV.join(" and ")
    ));
    out
}
