//! Integration tests using Tom Harte's `SingleStepTests` for the 6502.
//!
//! Each opcode file holds 10,000 randomised cases comparing register and
//! memory state after one instruction, plus its bus cycles. Only the
//! documented opcodes (and `$EB`) are checked: the other undocumented
//! slots are traps or plain NOPs here.
//!
//! Test data lives in `test-data/65x02/6502/v1/XX.json`.

use cycle6502::{Mos6502, Operation, Registers, Status, lookup};
use cyclebus::{Cpu, SimpleBus};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// JSON test case format.
#[derive(Deserialize)]
struct TestCase {
    name: String,
    initial: CpuState,
    #[serde(rename = "final")]
    final_state: CpuState,
    cycles: Vec<(u16, u8, String)>,
}

/// JSON CPU state format.
#[derive(Deserialize)]
struct CpuState {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

fn setup(cpu: &mut Mos6502, bus: &mut SimpleBus, state: &CpuState) {
    for &(addr, value) in &state.ram {
        bus.load(addr, &[value]);
    }
    cpu.restore(Registers {
        a: state.a,
        x: state.x,
        y: state.y,
        s: state.s,
        pc: state.pc,
        p: Status::from_byte(state.p),
    });
}

/// Compare the CPU/bus state against expected, returning a list of mismatches.
fn compare(cpu: &Mos6502, bus: &SimpleBus, expected: &CpuState) -> Vec<String> {
    let mut errors = Vec::new();
    let regs = cpu.registers();

    let pairs = [
        ("A", regs.a, expected.a),
        ("X", regs.x, expected.x),
        ("Y", regs.y, expected.y),
        ("S", regs.s, expected.s),
    ];
    for (name, got, want) in pairs {
        if got != want {
            errors.push(format!("{name}: got ${got:02X}, want ${want:02X}"));
        }
    }
    if regs.pc != expected.pc {
        errors.push(format!(
            "PC: got ${:04X}, want ${:04X}",
            regs.pc, expected.pc
        ));
    }

    // The register never holds B; U always reads back set
    let actual_p = regs.p.0;
    let expected_p = Status::from_byte(expected.p).0;
    if actual_p != expected_p {
        errors.push(format!(
            "P: got ${actual_p:02X} ({actual_p:08b}), want ${expected_p:02X} ({expected_p:08b})"
        ));
    }

    for &(addr, expected_val) in &expected.ram {
        let actual_val = bus.get(addr);
        if actual_val != expected_val {
            errors.push(format!(
                "RAM[${addr:04X}]: got ${actual_val:02X}, want ${expected_val:02X}"
            ));
        }
    }

    errors
}

fn is_checked(opcode: u8) -> bool {
    let ins = lookup(opcode);
    !ins.is_undocumented() || (opcode == 0xEB && ins.operation == Operation::Sbc)
}

#[test]
#[ignore = "requires test-data/65x02, run with --ignored"]
fn run_all() {
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("parent of crate dir")
        .parent()
        .expect("workspace root")
        .join("test-data/65x02/6502/v1");

    if !test_dir.exists() {
        eprintln!("Test data not found at {}", test_dir.display());
        eprintln!("Skipping SingleStepTests.");
        return;
    }

    let mut total_pass = 0u64;
    let mut total_fail = 0u64;

    for opcode in (0..=0xFF_u8).filter(|&op| is_checked(op)) {
        let filename = format!("{opcode:02x}.json");
        let path = test_dir.join(&filename);
        if !path.exists() {
            continue;
        }

        let data = fs::read_to_string(&path).unwrap_or_else(|e| {
            panic!("Failed to read {}: {e}", path.display());
        });
        let tests: Vec<TestCase> = serde_json::from_str(&data).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {e}", path.display());
        });

        let mut file_pass = 0u32;
        let mut file_fail = 0u32;
        let mut first_failures: Vec<String> = Vec::new();

        for test in &tests {
            let mut cpu = Mos6502::new();
            let mut bus = SimpleBus::new();
            setup(&mut cpu, &mut bus, &test.initial);

            let mut errors = Vec::new();
            let expected_ticks = test.cycles.len();
            for tick in 1..=expected_ticks {
                cpu.tick(&mut bus);
                if cpu.is_instruction_complete() && tick != expected_ticks {
                    errors.push(format!("finished after {tick} of {expected_ticks} cycles"));
                    break;
                }
            }
            if !cpu.is_instruction_complete() {
                errors.push(format!(
                    "{} cycles left after {expected_ticks}",
                    cpu.remaining_cycles()
                ));
            }
            errors.extend(compare(&cpu, &bus, &test.final_state));

            if errors.is_empty() {
                file_pass += 1;
            } else {
                file_fail += 1;
                if first_failures.len() < 5 {
                    first_failures.push(format!(
                        "  FAIL [{}]: {}",
                        test.name,
                        errors.join(", ")
                    ));
                }
            }
        }

        let status = if file_fail == 0 { "PASS" } else { "FAIL" };
        println!(
            "Opcode ${opcode:02X} {:<4} ({filename}): {status} {file_pass}/{} passed",
            lookup(opcode).mnemonic,
            file_pass + file_fail
        );
        for msg in &first_failures {
            println!("{msg}");
        }

        total_pass += u64::from(file_pass);
        total_fail += u64::from(file_fail);
    }

    println!();
    println!("=== SingleStepTests Summary ===");
    println!(
        "Total: {}, Pass: {total_pass}, Fail: {total_fail}",
        total_pass + total_fail
    );

    assert_eq!(total_fail, 0, "{total_fail} tests failed");
}

#[test]
fn checked_opcodes_cover_documented_set() {
    let checked = (0..=0xFF_u8).filter(|&op| is_checked(op)).count();
    assert_eq!(checked, 152, "151 documented opcodes plus $EB");
}
