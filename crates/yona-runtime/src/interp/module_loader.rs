//! ModuleLoader algorithm (spec §4.7): resolve an FQN to a file, parse it,
//! evaluate it in a fresh top-level frame, cache the result.

use std::fs;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use yona_ast::{FqnExpr, ModuleAst};
use yona_common::{HostError, RuntimeErrorKind, SourceContext};

use crate::frame::Frame;
use crate::modules::resolve_fqn_path;
use crate::value::{FunctionBody, FunctionValue, ModuleValue, RecordInfo, Value};

use super::Interpreter;

impl Interpreter {
    /// Resolves, loads (parsing + evaluating if not cached), and returns a
    /// module value for `fqn`.
    pub fn load_module(&mut self, fqn: &FqnExpr, context: &SourceContext) -> Result<Rc<ModuleValue>, HostError> {
        let key = fqn.key();
        if let Some(cached) = self.module_cache.get(&key) {
            return Ok(cached);
        }

        let Some(path) = resolve_fqn_path(fqn, &self.module_paths) else {
            self.raise_runtime(RuntimeErrorKind::ModuleNotFound, format!("module not found: {fqn}"), context.clone());
            return Err(HostError::at(format!("module not found: {fqn}"), context.clone()));
        };

        let source = fs::read_to_string(&path).map_err(|e| {
            HostError::at(format!("module file unreadable: {} ({e})", path.display()), context.clone())
        })?;

        let module_ast = yona_syntax::parse_module(&source, &path.to_string_lossy()).map_err(|errors| {
            let summary = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
            HostError::at(format!("failed to parse module {fqn}: {summary}"), context.clone())
        })?;

        let module_value = self.eval_module(&module_ast)?;
        self.module_cache.insert(key, module_value.clone());
        Ok(module_value)
    }

    /// Evaluates a parsed module AST in a fresh top-level frame (spec §4.7
    /// step 5): registers records, builds function closures, and collects
    /// exports.
    pub fn eval_module(&mut self, module_ast: &ModuleAst) -> Result<Rc<ModuleValue>, HostError> {
        let key = module_ast.fqn.key();
        self.module_stack.push(key.clone());
        let module_frame = Frame::root();

        for record in &module_ast.records {
            let info = RecordInfo { name: record.name.clone(), fields: record.fields.clone() };
            self.record_types.register(info.clone());

            let fields: Rc<Vec<String>> = Rc::new(record.fields.clone());
            let constructor_name = record.name.clone();
            let ctor_fields = fields.clone();
            let ctor_name_for_closure = constructor_name.clone();
            let native: crate::value::NativeFn = Rc::new(move |args: &[Value]| {
                Ok(Value::Record(Rc::new(crate::value::RecordValue {
                    constructor: ctor_name_for_closure.as_str().into(),
                    fields: ctor_fields.clone(),
                    values: args.to_vec(),
                })))
            });
            let constructor = Value::Function(Rc::new(FunctionValue {
                name: Some(constructor_name.clone()),
                arity: fields.len(),
                partial: Vec::new(),
                body: FunctionBody::Native(native),
                constructor_fields: Some(fields),
            }));
            module_frame.write(constructor_name, constructor);
        }

        let mut exports = FxHashMap::default();
        for function in &module_ast.functions {
            let name = function.name.clone().unwrap_or_default();
            let closure = Value::Function(Rc::new(FunctionValue {
                name: Some(name.clone()),
                arity: function.patterns.len(),
                partial: Vec::new(),
                body: FunctionBody::User {
                    patterns: Rc::new(function.patterns.clone()),
                    bodies: Rc::new(function.bodies.clone()),
                    frame: module_frame.clone(),
                },
                constructor_fields: None,
            }));
            module_frame.write(name.clone(), closure.clone());
            if module_ast.exports.iter().any(|e| e == &name) {
                exports.insert(name, closure);
            }
        }

        self.module_stack.pop();

        let mut module_records = FxHashMap::default();
        for record in &module_ast.records {
            module_records.insert(record.name.clone(), RecordInfo { name: record.name.clone(), fields: record.fields.clone() });
        }

        Ok(Rc::new(ModuleValue { fqn: fqn_parts(&module_ast.fqn), exports, records: module_records }))
    }
}

fn fqn_parts(fqn: &FqnExpr) -> Vec<String> {
    let mut parts = fqn.package.clone();
    parts.push(fqn.module.clone());
    parts
}
