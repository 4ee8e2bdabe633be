/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use hacktools::errors::{CliError, TranslationError};
use hacktools::file_reader::MockFileReader;
use hacktools::{assemble, translate};
use std::path::Path;

// A minimal Hack machine, just big enough to execute translated programs
// and observe stack and segment state.
struct HackMachine {
    ram: Vec<i16>,
    rom: Vec<u16>,
    pc: usize,
    a: i16,
    d: i16,
}

impl HackMachine {
    fn load(words: &[String]) -> Self {
        let rom = words
            .iter()
            .map(|w| u16::from_str_radix(w, 2).expect("16-bit binary word"))
            .collect();

        HackMachine {
            ram: vec![0; 32768],
            rom,
            pc: 0,
            a: 0,
            d: 0,
        }
    }

    fn run(&mut self, max_steps: usize) {
        for _ in 0..max_steps {
            if self.pc >= self.rom.len() {
                return;
            }
            self.step();
        }
    }

    fn step(&mut self) {
        let instr = self.rom[self.pc];

        if instr & 0x8000 == 0 {
            self.a = instr as i16;
            self.pc += 1;
            return;
        }

        let a_bit = (instr >> 12) & 1;
        let c = (instr >> 6) & 0x3F;
        let d_bits = (instr >> 3) & 0x7;
        let j_bits = instr & 0x7;

        // M reads and writes use the pre-instruction A register
        let m_addr = (self.a as u16 & 0x7FFF) as usize;
        let x = self.d;
        let y = if a_bit == 1 { self.ram[m_addr] } else { self.a };

        let out: i16 = match c {
            0b101010 => 0,
            0b111111 => 1,
            0b111010 => -1,
            0b001100 => x,
            0b110000 => y,
            0b001101 => !x,
            0b110001 => !y,
            0b001111 => x.wrapping_neg(),
            0b110011 => y.wrapping_neg(),
            0b011111 => x.wrapping_add(1),
            0b110111 => y.wrapping_add(1),
            0b001110 => x.wrapping_sub(1),
            0b110010 => y.wrapping_sub(1),
            0b000010 => x.wrapping_add(y),
            0b010011 => x.wrapping_sub(y),
            0b000111 => y.wrapping_sub(x),
            0b000000 => x & y,
            0b010101 => x | y,
            _ => panic!("unknown comp bits {c:06b} at pc {}", self.pc),
        };

        if d_bits & 0b001 != 0 {
            self.ram[m_addr] = out;
        }
        if d_bits & 0b100 != 0 {
            self.a = out;
        }
        if d_bits & 0b010 != 0 {
            self.d = out;
        }

        let jump = match j_bits {
            0b000 => false,
            0b001 => out > 0,
            0b010 => out == 0,
            0b011 => out >= 0,
            0b100 => out < 0,
            0b101 => out != 0,
            0b110 => out <= 0,
            0b111 => true,
            _ => unreachable!(),
        };

        if jump {
            self.pc = (self.a as u16 & 0x7FFF) as usize;
        } else {
            self.pc += 1;
        }
    }

    fn sp(&self) -> i16 {
        self.ram[0]
    }

    fn top(&self) -> i16 {
        self.ram[(self.sp() - 1) as usize]
    }
}

fn translate_single(text: &str) -> String {
    let mut reader = MockFileReader::default();
    reader.add_file("Test.vm", text);
    translate(Path::new("Test.vm"), &reader).unwrap().asm
}

// Translates, assembles and executes one .vm unit with SP preset to 256.
fn run_vm(text: &str, setup: &[(usize, i16)], max_steps: usize) -> HackMachine {
    let words = assemble(&translate_single(text)).unwrap();
    let mut machine = HackMachine::load(&words);
    machine.ram[0] = 256;
    for (addr, value) in setup {
        machine.ram[*addr] = *value;
    }
    machine.run(max_steps);
    machine
}

fn translation_error(err: &anyhow::Error) -> &TranslationError {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<TranslationError>())
        .expect("expected a translation error in the chain")
}

// ---------- arithmetic ----------

#[test]
fn test_add_leaves_sum_on_stack() {
    let machine = run_vm("push constant 7\npush constant 8\nadd\n", &[], 1000);
    assert_eq!(machine.ram[256], 15);
    assert_eq!(machine.sp(), 257);
}

#[test]
fn test_sub_is_x_minus_y() {
    let machine = run_vm("push constant 5\npush constant 7\nsub\n", &[], 1000);
    assert_eq!(machine.top(), -2);
    assert_eq!(machine.sp(), 257);
}

#[test]
fn test_bitwise_and_or_neg_not() {
    let source = "\
push constant 7
push constant 3
and
push constant 8
or
neg
not
";
    let machine = run_vm(source, &[], 1000);
    // ((7 & 3) | 8) = 11; !(-11) = 10
    assert_eq!(machine.top(), 10);
    assert_eq!(machine.sp(), 257);
}

#[test]
fn test_comparisons_write_minus_one_or_zero() {
    let machine = run_vm("push constant 5\npush constant 3\ngt\n", &[], 1000);
    assert_eq!(machine.top(), -1);
    assert_eq!(machine.sp(), 257);

    let machine = run_vm("push constant 5\npush constant 3\nlt\n", &[], 1000);
    assert_eq!(machine.top(), 0);

    let machine = run_vm("push constant 3\npush constant 3\neq\n", &[], 1000);
    assert_eq!(machine.top(), -1);
}

#[test]
fn test_push_pop_moves_sp_by_one() {
    let machine = run_vm("push constant 9\n", &[], 1000);
    assert_eq!(machine.sp(), 257);

    let machine = run_vm("push constant 9\npop temp 0\n", &[], 1000);
    assert_eq!(machine.sp(), 256);
    assert_eq!(machine.ram[5], 9);
}

#[test]
fn test_comparison_labels_are_per_site() {
    let asm = translate_single("push constant 1\npush constant 2\neq\npush constant 3\neq\n");
    assert!(asm.contains("(EQ_TRUE_0)"));
    assert!(asm.contains("(EQ_END_0)"));
    assert!(asm.contains("(EQ_TRUE_1)"));
    assert!(asm.contains("(EQ_END_1)"));
    assert_eq!(asm.matches("(EQ_TRUE_0)").count(), 1);
}

// ---------- memory access ----------

#[test]
fn test_indirect_segments_and_temp() {
    let source = "\
push constant 10
pop local 0
push constant 21
pop argument 1
push constant 36
pop temp 6
push local 0
push argument 1
add
push temp 6
add
";
    let machine = run_vm(source, &[(1, 300), (2, 400)], 2000);
    assert_eq!(machine.ram[300], 10);
    assert_eq!(machine.ram[401], 21);
    assert_eq!(machine.ram[11], 36);
    assert_eq!(machine.top(), 67);
    assert_eq!(machine.sp(), 257);
}

#[test]
fn test_pointer_this_that() {
    let source = "\
push constant 3030
pop pointer 0
push constant 3040
pop pointer 1
push constant 32
pop this 2
push constant 46
pop that 6
push pointer 0
push pointer 1
add
push this 2
sub
push that 6
add
";
    let machine = run_vm(source, &[], 2000);
    assert_eq!(machine.ram[3], 3030);
    assert_eq!(machine.ram[4], 3040);
    assert_eq!(machine.ram[3032], 32);
    assert_eq!(machine.ram[3046], 46);
    assert_eq!(machine.top(), 6084);
    assert_eq!(machine.sp(), 257);
}

#[test]
fn test_static_symbols_are_file_scoped() {
    let asm = translate_single("push constant 8\npop static 3\npush static 3\n");
    assert!(asm.contains("@Test.3"));
}

#[test]
fn test_pop_constant_is_rejected() {
    let mut reader = MockFileReader::default();
    reader.add_file("Test.vm", "push constant 1\npop constant 0\n");
    let err = translate(Path::new("Test.vm"), &reader).unwrap_err();
    assert_eq!(
        translation_error(&err),
        &TranslationError::PopConstant { line: 2 }
    );
}

#[test]
fn test_pointer_index_out_of_range() {
    let mut reader = MockFileReader::default();
    reader.add_file("Test.vm", "push pointer 2\n");
    let err = translate(Path::new("Test.vm"), &reader).unwrap_err();
    assert_eq!(
        translation_error(&err),
        &TranslationError::InvalidPointerIndex { line: 1, index: 2 }
    );
}

// ---------- program flow ----------

#[test]
fn test_if_goto_pops_and_branches_on_nonzero() {
    let source = "\
push constant 0
if-goto SKIPPED
push constant 1
if-goto TAKEN
push constant 999
label SKIPPED
label TAKEN
";
    let machine = run_vm(source, &[], 1000);
    // both if-gotos popped their operand; the second one branched over
    // the push of 999
    assert_eq!(machine.sp(), 256);
}

#[test]
fn test_goto_loop_computes_sum() {
    // sum = 1 + 2 + ... + 5, standard counting loop
    let source = "\
push constant 0
pop local 0
push constant 1
pop local 1
label LOOP
push local 1
push constant 5
gt
if-goto DONE
push local 0
push local 1
add
pop local 0
push local 1
push constant 1
add
pop local 1
goto LOOP
label DONE
push local 0
";
    let machine = run_vm(source, &[(1, 300)], 20000);
    assert_eq!(machine.top(), 15);
}

// ---------- functions ----------

#[test]
fn test_call_return_splices_return_value_over_arguments() {
    let source = "\
push constant 41
call Foo.bar 1
label HALT
goto HALT
function Foo.bar 0
push argument 0
push constant 1
add
return
";
    let machine = run_vm(source, &[], 20000);
    // the return value sits where the argument used to be
    assert_eq!(machine.ram[256], 42);
    assert_eq!(machine.sp(), 257);
}

#[test]
fn test_function_initializes_locals_to_zero() {
    let source = "\
push constant 77
call Foo.zeros 0
label HALT
goto HALT
function Foo.zeros 3
push local 0
push local 1
add
push local 2
add
return
";
    let machine = run_vm(source, &[], 20000);
    // locals start zeroed no matter what the stack held before
    assert_eq!(machine.ram[256], 77);
    assert_eq!(machine.ram[257], 0);
    assert_eq!(machine.sp(), 258);
}

#[test]
fn test_nested_calls_restore_caller_frame() {
    let source = "\
call Outer.run 0
label HALT
goto HALT
function Outer.run 1
push constant 10
pop local 0
push constant 32
call Inner.inc 1
push local 0
add
return
function Inner.inc 0
push argument 0
push constant 1
add
return
";
    let machine = run_vm(source, &[(1, 300), (2, 400), (3, 3000), (4, 4000)], 50000);
    // Outer.run returns (32 + 1) + 10
    assert_eq!(machine.ram[256], 43);
    assert_eq!(machine.sp(), 257);
    // caller segment bases come back out of the frame
    assert_eq!(machine.ram[1], 300);
    assert_eq!(machine.ram[2], 400);
    assert_eq!(machine.ram[3], 3000);
    assert_eq!(machine.ram[4], 4000);
}

#[test]
fn test_scoped_labels_do_not_collide_across_functions() {
    let source = "\
function Foo.a 0
label LOOP
goto LOOP
function Foo.b 0
label LOOP
goto LOOP
";
    let asm = translate_single(source);
    assert!(asm.contains("(Foo.a$LOOP)"));
    assert!(asm.contains("(Foo.b$LOOP)"));
}

#[test]
fn test_return_labels_stay_unique_across_calls() {
    let source = "\
call Foo.f 0
call Foo.f 0
label HALT
goto HALT
function Foo.f 0
push constant 0
return
";
    let asm = translate_single(source);
    assert!(asm.contains("(Foo.f$ret.0)"));
    assert!(asm.contains("(Foo.f$ret.1)"));
    assert_eq!(asm.matches("(Foo.f$ret.0)").count(), 1);
}

// ---------- multi-unit driver ----------

#[test]
fn test_directory_mode_bootstraps_and_runs_sys_init() {
    let mut reader = MockFileReader::default();
    reader.add_file(
        "Prog/Sys.vm",
        "function Sys.init 0\npush constant 5\ncall Main.main 1\nlabel HALT\ngoto HALT\n",
    );
    reader.add_file(
        "Prog/Main.vm",
        "function Main.main 1\npush argument 0\npush constant 2\nadd\npop local 0\npush local 0\nreturn\n",
    );

    let translation = translate(Path::new("Prog"), &reader).unwrap();
    assert_eq!(translation.output_path, Path::new("Prog/Prog.asm"));

    let words = assemble(&translation.asm).unwrap();
    let mut machine = HackMachine::load(&words);
    machine.run(50000);

    // bootstrap set SP itself; Main.main's value is back on Sys.init's
    // working stack
    assert_eq!(machine.ram[261], 7);
    assert_eq!(machine.sp(), 262);
}

#[test]
fn test_directory_mode_orders_units_by_base_name() {
    let mut reader = MockFileReader::default();
    reader.add_file("Prog/Main.vm", "push constant 1\n");
    reader.add_file("Prog/Abc.vm", "push constant 2\n");

    let translation = translate(Path::new("Prog"), &reader).unwrap();
    let abc = translation.asm.find("=== Abc.vm ===").unwrap();
    let main = translation.asm.find("=== Main.vm ===").unwrap();
    assert!(abc < main);
}

#[test]
fn test_single_file_mode_has_no_bootstrap() {
    let asm = translate_single("push constant 1\n");
    assert!(!asm.contains("Sys.init"));
    assert!(asm.starts_with("// === Test.vm ==="));
}

#[test]
fn test_directory_mode_bootstrap_comes_first() {
    let mut reader = MockFileReader::default();
    reader.add_file("Prog/Main.vm", "push constant 1\n");

    let translation = translate(Path::new("Prog"), &reader).unwrap();
    assert!(translation.asm.starts_with("// bootstrap: SP=256; call Sys.init"));
    let bootstrap = translation.asm.find("@256").unwrap();
    let unit = translation.asm.find("=== Main.vm ===").unwrap();
    assert!(bootstrap < unit);
}

#[test]
fn test_static_namespaces_differ_per_unit() {
    let mut reader = MockFileReader::default();
    reader.add_file("Prog/Main.vm", "push constant 1\npop static 0\n");
    reader.add_file("Prog/Other.vm", "push constant 2\npop static 0\n");

    let translation = translate(Path::new("Prog"), &reader).unwrap();
    assert!(translation.asm.contains("@Main.0"));
    assert!(translation.asm.contains("@Other.0"));
}

#[test]
fn test_counters_continue_across_units() {
    let mut reader = MockFileReader::default();
    reader.add_file("Prog/Aaa.vm", "push constant 1\npush constant 2\neq\n");
    reader.add_file("Prog/Bbb.vm", "push constant 3\npush constant 4\neq\n");

    let translation = translate(Path::new("Prog"), &reader).unwrap();
    assert!(translation.asm.contains("(EQ_TRUE_0)"));
    assert!(translation.asm.contains("(EQ_TRUE_1)"));
    assert_eq!(translation.asm.matches("(EQ_TRUE_0)").count(), 1);
}

#[test]
fn test_translation_is_deterministic() {
    let mut reader = MockFileReader::default();
    reader.add_file("Prog/Main.vm", "push constant 1\npush constant 2\neq\ncall Foo.f 0\n");
    reader.add_file("Prog/Sys.vm", "function Foo.f 0\npush constant 0\nreturn\n");

    let first = translate(Path::new("Prog"), &reader).unwrap();
    let second = translate(Path::new("Prog"), &reader).unwrap();
    assert_eq!(first.asm, second.asm);
}

#[test]
fn test_non_vm_single_file_is_rejected() {
    let mut reader = MockFileReader::default();
    reader.add_file("Test.asm", "push constant 1\n");
    let err = translate(Path::new("Test.asm"), &reader).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CliError>(),
        Some(CliError::NotVmInput)
    ));
}

// ---------- on-disk driver ----------

#[test]
fn test_directory_translation_on_disk() {
    use hacktools::file_reader::DiskFileReader;
    use std::fs;

    let dir = tempfile::tempdir().unwrap();
    let prog = dir.path().join("Prog");
    fs::create_dir(&prog).unwrap();
    fs::write(prog.join("Main.vm"), "push constant 1\n").unwrap();
    fs::write(prog.join("Abc.vm"), "push constant 2\n").unwrap();
    fs::write(prog.join("notes.txt"), "not vm code\n").unwrap();

    let translation = translate(&prog, &DiskFileReader).unwrap();
    assert_eq!(translation.output_path, prog.join("Prog.asm"));
    assert!(translation.asm.contains("=== Abc.vm ==="));
    assert!(translation.asm.contains("=== Main.vm ==="));
    assert!(!translation.asm.contains("notes"));

    let abc = translation.asm.find("=== Abc.vm ===").unwrap();
    let main = translation.asm.find("=== Main.vm ===").unwrap();
    assert!(abc < main);
}

#[test]
fn test_single_file_translation_on_disk() {
    use hacktools::file_reader::DiskFileReader;
    use std::fs;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Simple.vm");
    fs::write(&input, "push constant 3\npush constant 4\nadd\n").unwrap();

    let translation = translate(&input, &DiskFileReader).unwrap();
    assert_eq!(translation.output_path, dir.path().join("Simple.asm"));
    assert!(!translation.asm.contains("Sys.init"));
    assert!(translation.asm.contains("@Simple") || translation.asm.contains("=== Simple.vm ==="));
}

#[test]
fn test_empty_directory_is_rejected() {
    use hacktools::file_reader::DiskFileReader;
    use std::fs;

    let dir = tempfile::tempdir().unwrap();
    let prog = dir.path().join("Empty");
    fs::create_dir(&prog).unwrap();

    let err = translate(&prog, &DiskFileReader).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CliError>(),
        Some(CliError::NoVmFiles(_))
    ));
}
