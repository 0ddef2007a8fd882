// ABOUTME: Configuration and constants for the Lux interpreter
// Version info, REPL strings, and the evaluator's resource limits.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const WELCOME_MESSAGE: &str = "Lux Interpreter";
pub const WELCOME_SUBTITLE: &str = "A tree-walking interpreter for the Lux scripting language";
pub const WELCOME_FOOTER: &str = "Type .help for help, .exit (or Ctrl-D) to quit.";

/// File extension appended to import paths when absent.
pub const SOURCE_EXTENSION: &str = ".lux";

/// REPL history file, stored in the working directory.
pub const HISTORY_FILE: &str = ".lux_history";

/// Evaluator steps allowed per top-level evaluation. Every statement entry,
/// expression entry, and loop iteration counts as one step.
pub const STEP_LIMIT: u64 = 10_000_000;

/// Live user-function frames allowed before a call fails. The step limit
/// alone cannot stop native stack exhaustion in a tree walker.
pub const MAX_CALL_DEPTH: usize = 1000;

pub const HELP_TEXT: &str = r#"
Available commands:
  .help                - Show this help message
  .exit                - Exit the REPL

Type any Lux statement to evaluate it. Blocks (if/while/for/func/try)
may span multiple lines; the prompt changes until every block is closed.
Use Ctrl-D or .exit to quit.
"#;
