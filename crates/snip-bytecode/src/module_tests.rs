use crate::{
    BinaryOp, Constant, Function, HEADER_SIZE, Instruction, Module, ModuleError,
};

fn sample() -> Module {
    Module {
        name: "Snippet_1_abc".to_string(),
        constants: vec![Constant::Int(2), Constant::Str("two".to_string())],
        names: vec!["Length".to_string()],
        functions: vec![Function {
            name: "Execute".to_string(),
            params: vec![],
            code: vec![
                Instruction::Const(0),
                Instruction::Const(0),
                Instruction::Binary(BinaryOp::Add),
                Instruction::Return,
            ],
        }],
        locals: 0,
    }
}

#[test]
fn image_roundtrip() {
    let module = sample();
    let bytes = module.to_bytes().unwrap();

    assert_eq!(&bytes[..4], b"SNPB");
    assert_eq!(Module::load(&bytes).unwrap(), module);
}

#[test]
fn rejects_short_image() {
    let err = Module::load(&[0u8; 3]).unwrap_err();

    assert!(matches!(err, ModuleError::FileTooSmall(3)));
}

#[test]
fn rejects_bad_magic() {
    let mut bytes = sample().to_bytes().unwrap();
    bytes[0] = b'X';

    assert!(matches!(Module::load(&bytes), Err(ModuleError::InvalidMagic)));
}

#[test]
fn rejects_bad_version() {
    let mut bytes = sample().to_bytes().unwrap();
    bytes[4] = 99;

    let err = Module::load(&bytes).unwrap_err();

    assert_eq!(err.to_string(), "unsupported version: 99 (expected 1)");
}

#[test]
fn rejects_truncated_image() {
    let bytes = sample().to_bytes().unwrap();

    let err = Module::load(&bytes[..bytes.len() - 1]).unwrap_err();

    assert!(matches!(err, ModuleError::SizeMismatch { .. }));
}

#[test]
fn rejects_corrupted_payload() {
    let mut bytes = sample().to_bytes().unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;

    let err = Module::load(&bytes).unwrap_err();

    assert!(matches!(err, ModuleError::ChecksumMismatch { .. }));
}

#[test]
fn entry_point_lookup() {
    let module = sample();

    assert_eq!(module.default_entry_point().unwrap(), 0);
    let err = module.entry_point("Main").unwrap_err();
    assert_eq!(err.to_string(), "entry point `Main` not found");
    assert!(HEADER_SIZE < module.to_bytes().unwrap().len());
}
