#![no_main]

use libfuzzer_sys::fuzz_target;
use tinyawk::{Interpreter, Lexer, Parser};

fuzz_target!(|data: &[u8]| {
    // First 1/3 is the program, rest is input
    let split_point = data.len() / 3;
    let (program_bytes, input_bytes) = data.split_at(split_point);

    let Ok(program) = std::str::from_utf8(program_bytes) else {
        return;
    };
    let Ok(input) = std::str::from_utf8(input_bytes) else {
        return;
    };

    // Limit input sizes to prevent hangs
    if program.len() > 10000 || input.len() > 100000 {
        return;
    }

    let Ok(tokens) = Lexer::new(program).tokenize() else {
        return;
    };
    let Ok(ast) = Parser::new(tokens).parse() else {
        return;
    };

    // Loops may legitimately never terminate
    if program.contains("for") {
        return;
    }

    let mut interpreter = Interpreter::new(ast);
    let mut output = Vec::new();
    let _ = interpreter.run(input, &mut output);
});
