//! `Std\IO` -- native module for terminal and file I/O (grounded on the
//! original implementation's `io_module`: print/println/file read/write).

use std::fs;
use std::rc::Rc;

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

fn print(args: &[Value]) -> Result<Value, HostError> {
    print!("{}", expect_string(args, 0, "print")?);
    Ok(Value::Unit)
}

fn println(args: &[Value]) -> Result<Value, HostError> {
    println!("{}", expect_string(args, 0, "println")?);
    Ok(Value::Unit)
}

fn read_file(args: &[Value]) -> Result<Value, HostError> {
    let path = expect_string(args, 0, "readFile")?;
    fs::read_to_string(path.as_ref()).map(Value::string).map_err(|e| HostError::new(e.to_string()))
}

fn write_file(args: &[Value]) -> Result<Value, HostError> {
    let path = expect_string(args, 0, "writeFile")?;
    let contents = expect_string(args, 1, "writeFile")?;
    fs::write(path.as_ref(), contents.as_ref()).map(|_| Value::Unit).map_err(|e| HostError::new(e.to_string()))
}

fn append_file(args: &[Value]) -> Result<Value, HostError> {
    use std::io::Write;
    let path = expect_string(args, 0, "appendFile")?;
    let contents = expect_string(args, 1, "appendFile")?;
    fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path.as_ref())
        .and_then(|mut f| f.write_all(contents.as_bytes()))
        .map(|_| Value::Unit)
        .map_err(|e| HostError::new(e.to_string()))
}

fn file_exists(args: &[Value]) -> Result<Value, HostError> {
    let path = expect_string(args, 0, "fileExists")?;
    Ok(Value::Bool(std::path::Path::new(path.as_ref()).exists()))
}

fn delete_file(args: &[Value]) -> Result<Value, HostError> {
    let path = expect_string(args, 0, "deleteFile")?;
    fs::remove_file(path.as_ref()).map(|_| Value::Unit).map_err(|e| HostError::new(e.to_string()))
}

fn read_line(_args: &[Value]) -> Result<Value, HostError> {
    use std::io::BufRead;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line).map_err(|e| HostError::new(e.to_string()))?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Value::string(line))
}

fn read_char(_args: &[Value]) -> Result<Value, HostError> {
    use std::io::Read;
    let mut buf = [0u8; 4];
    let mut stdin = std::io::stdin().lock();
    let mut len = 0;
    loop {
        if stdin.read_exact(&mut buf[len..len + 1]).is_err() {
            return Ok(Value::Unit);
        }
        len += 1;
        if let Ok(s) = std::str::from_utf8(&buf[..len]) {
            if let Some(c) = s.chars().next() {
                return Ok(Value::Char(c));
            }
        }
        if len == 4 {
            return Err(HostError::new("readChar: invalid UTF-8 sequence"));
        }
    }
}

pub fn module() -> (String, Rc<ModuleValue>) {
    build_native_module(
        &["Std"],
        "IO",
        vec![
            NativeExport { name: "print", arity: 1, func: Rc::new(print) },
            NativeExport { name: "println", arity: 1, func: Rc::new(println) },
            NativeExport { name: "readFile", arity: 1, func: Rc::new(read_file) },
            NativeExport { name: "writeFile", arity: 2, func: Rc::new(write_file) },
            NativeExport { name: "appendFile", arity: 2, func: Rc::new(append_file) },
            NativeExport { name: "fileExists", arity: 1, func: Rc::new(file_exists) },
            NativeExport { name: "deleteFile", arity: 1, func: Rc::new(delete_file) },
            NativeExport { name: "readLine", arity: 0, func: Rc::new(read_line) },
            NativeExport { name: "readChar", arity: 0, func: Rc::new(read_char) },
        ],
    )
}
