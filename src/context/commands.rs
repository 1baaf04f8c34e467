//! Context command handlers

use std::io::Write;

use log::debug;

use crate::cli::{ConfigAction, OutputFormat};
use crate::error::CtlError;
use crate::output::render;
use crate::ui::Console;

use super::manager::ContextManager;

const KIND: &str = "Context";
const NO_CONTEXTS: &str = "No context pre-defined.";

/// Dispatch config subcommands, returning the process exit code
pub fn run_config_command<O: Write, E: Write>(
    manager: &mut ContextManager,
    action: &ConfigAction,
    format: OutputFormat,
    console: &mut Console<O, E>,
) -> i32 {
    match action {
        ConfigAction::GetContexts => run_get_contexts(manager, format, console),
        ConfigAction::CurrentContext => run_current_context(manager, format, console),
        ConfigAction::UseContext(args) => run_use_context(manager, &args.name, console),
    }
}

/// List all contexts
fn run_get_contexts<O: Write, E: Write>(
    manager: &ContextManager,
    format: OutputFormat,
    console: &mut Console<O, E>,
) -> i32 {
    if manager.list_contexts().is_empty() {
        console.println(NO_CONTEXTS);
        return 0;
    }

    let records = manager.render_all_contexts();
    debug!("Rendering {} context(s) as {}", records.len(), format);
    match render(console.out(), KIND, &records, format) {
        Ok(()) => 0,
        Err(e) => {
            console.eprintln(format!("error: {}", e));
            1
        }
    }
}

/// Show the current context
fn run_current_context<O: Write, E: Write>(
    manager: &ContextManager,
    format: OutputFormat,
    console: &mut Console<O, E>,
) -> i32 {
    if manager.list_contexts().is_empty() {
        console.println(NO_CONTEXTS);
        return 0;
    }

    let record = manager.render_current_context();
    match render(console.out(), KIND, &[record], format) {
        Ok(()) => 0,
        Err(e) => {
            console.eprintln(format!("error: {}", e));
            1
        }
    }
}

/// Switch the current context
fn run_use_context<O: Write, E: Write>(
    manager: &mut ContextManager,
    name: &str,
    console: &mut Console<O, E>,
) -> i32 {
    match manager.select_context(name) {
        Ok(()) => {
            console.println(format!("Switched to context \"{}\".", name));
            0
        }
        Err(e @ CtlError::NotFound(_)) => {
            console.eprintln(format!("error: {}", e));
            1
        }
        Err(e) => {
            console.eprintln(format!("error: failed to switch context: {}", e));
            1
        }
    }
}
