//! `Std\System` -- native module for process/environment access (grounded
//! on the original implementation's `system_module`).

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use yona_common::HostError;

use crate::modules::{build_native_module, NativeExport};
use crate::value::{ModuleValue, Value};

fn expect_string(args: &[Value], idx: usize, fn_name: &str) -> Result<Rc<str>, HostError> {
    match args.get(idx) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(HostError::new(format!("{fn_name}: expected String, found {:?}", other.kind()))),
        None => Err(HostError::new(format!("{fn_name}: missing argument {idx}"))),
    }
}

fn expect_int(args: &[Value], idx: usize, fn_name: &str) -> Result<i64, HostError> {
    match args.get(idx) {
        Some(Value::Int(i)) => Ok(*i),
        Some(other) => Err(HostError::new(format!("{fn_name}: expected Int, found {:?}", other.kind()))),
        None => Err(HostError::new(format!("{fn_name}: missing argument {idx}"))),
    }
}

fn get_env(args: &[Value]) -> Result<Value, HostError> {
    let name = expect_string(args, 0, "getEnv")?;
    match std::env::var(name.as_ref()) {
        Ok(val) => Ok(Value::string(val)),
        Err(_) => Ok(Value::Unit),
    }
}

fn set_env(args: &[Value]) -> Result<Value, HostError> {
    let name = expect_string(args, 0, "setEnv")?;
    let value = expect_string(args, 1, "setEnv")?;
    // SAFETY: Yona programs run single-threaded (spec §5); no concurrent
    // readers of the environment exist while this call executes.
    unsafe {
        std::env::set_var(name.as_ref(), value.as_ref());
    }
    Ok(Value::Unit)
}

fn exit(args: &[Value]) -> Result<Value, HostError> {
    let code = expect_int(args, 0, "exit")?;
    std::process::exit(code as i32);
}

fn current_time_millis(_args: &[Value]) -> Result<Value, HostError> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| HostError::new(e.to_string()))?
        .as_millis();
    Ok(Value::Int(millis as i64))
}

fn sleep(args: &[Value]) -> Result<Value, HostError> {
    let millis = expect_int(args, 0, "sleep")?;
    std::thread::sleep(std::time::Duration::from_millis(millis.max(0) as u64));
    Ok(Value::Unit)
}

fn get_args(_args: &[Value]) -> Result<Value, HostError> {
    let args: Vec<Value> = std::env::args().skip(1).map(Value::string).collect();
    Ok(Value::seq(args))
}

fn get_cwd(_args: &[Value]) -> Result<Value, HostError> {
    let cwd = std::env::current_dir().map_err(|e| HostError::new(e.to_string()))?;
    Ok(Value::string(cwd.to_string_lossy().into_owned()))
}

fn set_cwd(args: &[Value]) -> Result<Value, HostError> {
    let path = expect_string(args, 0, "setCwd")?;
    std::env::set_current_dir(path.as_ref()).map(|_| Value::Unit).map_err(|e| HostError::new(e.to_string()))
}

pub fn module() -> (String, Rc<ModuleValue>) {
    build_native_module(
        &["Std"],
        "System",
        vec![
            NativeExport { name: "getEnv", arity: 1, func: Rc::new(get_env) },
            NativeExport { name: "setEnv", arity: 2, func: Rc::new(set_env) },
            NativeExport { name: "exit", arity: 1, func: Rc::new(exit) },
            NativeExport { name: "currentTimeMillis", arity: 0, func: Rc::new(current_time_millis) },
            NativeExport { name: "sleep", arity: 1, func: Rc::new(sleep) },
            NativeExport { name: "getArgs", arity: 0, func: Rc::new(get_args) },
            NativeExport { name: "getCwd", arity: 0, func: Rc::new(get_cwd) },
            NativeExport { name: "setCwd", arity: 1, func: Rc::new(set_cwd) },
        ],
    )
}
