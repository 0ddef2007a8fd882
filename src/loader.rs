// ABOUTME: Module loader orchestrating multi-file evaluation
//
// Resolves import paths relative to the importing file, guards against
// circular imports, caches executed modules, and merges their exports into
// the shared global environment.

use crate::config::SOURCE_EXTENSION;
use crate::env::Environment;
use crate::error::{LuxError, RuntimeError};
use crate::eval::{EvalOutcome, Evaluator, ImportFn};
use crate::lexer::Lexer;
use crate::parser;
use crate::value::Value;
use log::{debug, trace};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub struct ModuleLoader {
    output: Rc<RefCell<Vec<String>>>,
    globals: Rc<Environment>,
    /// Resolved absolute path → the module's post-execution environment.
    cache: RefCell<HashMap<PathBuf, Rc<Environment>>>,
    /// Paths currently executing; a hit here is a circular import.
    loading: RefCell<HashSet<PathBuf>>,
}

impl ModuleLoader {
    /// Creates a loader with a fresh global environment holding the full
    /// built-in registry as constants.
    pub fn new() -> Rc<Self> {
        let output = Rc::new(RefCell::new(Vec::new()));
        let globals = Environment::new();
        crate::builtins::register_builtins(&globals, &output);
        Rc::new(ModuleLoader {
            output,
            globals,
            cache: RefCell::new(HashMap::new()),
            loading: RefCell::new(HashSet::new()),
        })
    }

    pub fn output(&self) -> Rc<RefCell<Vec<String>>> {
        self.output.clone()
    }

    pub fn globals(&self) -> Rc<Environment> {
        self.globals.clone()
    }

    /// Runs an entry-point script file against the global environment.
    pub fn run_file(self: &Rc<Self>, path: &Path) -> EvalOutcome {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                return self.outcome(
                    0,
                    Some(
                        RuntimeError::bare(format!(
                            "Cannot read script '{}': {}",
                            path.display(),
                            err
                        ))
                        .to_string(),
                    ),
                );
            }
        };
        let file = path.to_string_lossy().to_string();

        // The entry file participates in cycle detection so a module cannot
        // import the script that is importing it.
        let resolved = absolutize(path);
        self.loading.borrow_mut().insert(resolved.clone());
        let outcome = self.run_source(&source, &file);
        self.loading.borrow_mut().remove(&resolved);
        outcome
    }

    /// Evaluates a source snippet against the global environment with
    /// imports enabled. Used for the entry script and for each REPL line.
    pub fn run_source(self: &Rc<Self>, source: &str, file: &str) -> EvalOutcome {
        let program = Lexer::new(source, file)
            .tokenize()
            .and_then(|tokens| parser::parse(tokens, file));
        let program = match program {
            Ok(program) => program,
            Err(err) => return self.outcome(0, Some(err.to_string())),
        };

        let mut evaluator = Evaluator::new(file, self.output.clone(), Some(self.import_fn()));
        let error = evaluator
            .run(&program, &self.globals)
            .err()
            .map(|e| e.to_string());
        self.outcome(evaluator.steps(), error)
    }

    fn outcome(&self, steps: u64, error: Option<String>) -> EvalOutcome {
        EvalOutcome {
            output: self.output.borrow().clone(),
            steps,
            error,
            env: self.globals.clone(),
        }
    }

    /// The import hook handed to evaluators; re-enters this loader.
    pub fn import_fn(self: &Rc<Self>) -> ImportFn {
        let loader = Rc::clone(self);
        Rc::new(move |path, from_file| loader.import(path, from_file))
    }

    /// Executes one `import` statement: resolve, guard, cache, merge.
    fn import(self: &Rc<Self>, request: &str, from_file: &str) -> Result<(), LuxError> {
        let path = resolve(request, from_file);
        trace!("import '{}' from {} -> {}", request, from_file, path.display());

        if self.loading.borrow().contains(&path) {
            return Err(RuntimeError::bare(format!(
                "Circular import detected: {}",
                path.display()
            ))
            .into());
        }

        if let Some(module_env) = self.cache.borrow().get(&path).cloned() {
            self.merge_exports(&module_env);
            return Ok(());
        }

        self.loading.borrow_mut().insert(path.clone());
        let result = self.execute_module(&path);
        self.loading.borrow_mut().remove(&path);

        let module_env = result?;
        self.cache.borrow_mut().insert(path.clone(), module_env.clone());
        self.merge_exports(&module_env);
        debug!("module {} loaded", path.display());
        Ok(())
    }

    /// Lexes, parses, and evaluates a module file in a child environment of
    /// the globals.
    fn execute_module(self: &Rc<Self>, path: &Path) -> Result<Rc<Environment>, LuxError> {
        let source = std::fs::read_to_string(path).map_err(|err| {
            LuxError::from(RuntimeError::bare(format!(
                "Cannot read module '{}': {}",
                path.display(),
                err
            )))
        })?;
        let file = path.to_string_lossy().to_string();

        let tokens = Lexer::new(&source, &file).tokenize()?;
        let program = parser::parse(tokens, &file)?;

        let module_env = Environment::with_parent(self.globals.clone());
        let mut evaluator = Evaluator::new(&file, self.output.clone(), Some(self.import_fn()));
        evaluator.run(&program, &module_env)?;
        Ok(module_env)
    }

    /// Propagates a module's exportable bindings into the global
    /// environment: user functions, built-ins, and constants. Non-constant
    /// data bindings stay module-private, and an existing global binding is
    /// never overwritten.
    fn merge_exports(&self, module_env: &Rc<Environment>) {
        for name in module_env.own_names() {
            let Some(entry) = module_env.own_entry(&name) else {
                continue;
            };
            let exportable = entry.constant
                || matches!(entry.value, Value::Function(_) | Value::Builtin { .. });
            if exportable && !self.globals.has(&name) {
                self.globals.define(name, entry.value, entry.constant);
            }
        }
    }
}

/// Joins the import argument against the importing file's directory,
/// appends the source extension when absent, and absolutises the result.
fn resolve(request: &str, from_file: &str) -> PathBuf {
    let mut name = request.to_string();
    if !name.ends_with(SOURCE_EXTENSION) {
        name.push_str(SOURCE_EXTENSION);
    }
    let base = Path::new(from_file).parent().unwrap_or_else(|| Path::new(""));
    absolutize(&base.join(name))
}

fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
