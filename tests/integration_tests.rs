//! Integration tests for the OpenOCD command layer
//!
//! Drives full operation flows through a scripted transport that checks
//! every command line the layer emits against the expected daemon grammar.

use std::collections::VecDeque;

use openocd_tcl::{ImageFormat, LoadImageOptions, Openocd, Result, TclError, TclRpc, Width};

/// Transport scripted with (expected command, reply) steps.
struct Script {
    steps: VecDeque<(String, Result<String>)>,
}

impl Script {
    fn new(steps: Vec<(&str, Result<String>)>) -> Self {
        Self {
            steps: steps
                .into_iter()
                .map(|(command, reply)| (command.to_string(), reply))
                .collect(),
        }
    }

    fn finished(&self) -> bool {
        self.steps.is_empty()
    }
}

impl TclRpc for Script {
    fn run(&mut self, command: &str) -> Result<String> {
        let (expected, reply) = self
            .steps
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted command: {}", command));
        assert_eq!(command, expected);
        reply
    }
}

fn ok(reply: &str) -> Result<String> {
    Ok(reply.to_string())
}

#[test]
fn test_halt_resume_flow() {
    let script = Script::new(vec![
        (
            "capture \"halt\"",
            ok("target halted due to debug-request, current mode: Thread\nxPSR: 0x01000000 pc: 0x080001c4 msp: 0x2000fff0"),
        ),
        ("capture \"resume\"", ok("")),
        ("capture \"resume 0x8000000\"", ok("")),
    ]);

    let mut ocd = Openocd::new(script);
    let halted = ocd.halt().unwrap();
    assert!(halted.contains("target halted"));
    ocd.resume(None).unwrap();
    ocd.resume(Some(0x0800_0000)).unwrap();
    assert!(ocd.get_ref().finished());
}

#[test]
fn test_memory_round_trip() {
    // The daemon replies with exactly the words that were written; parsing
    // the reply must reproduce the written list.
    let written = [0xdead_beef_u64, 0x1];
    let script = Script::new(vec![
        (
            "capture \"write_memory 0x20000000 32 {0xdeadbeef 0x1}\"",
            ok(""),
        ),
        ("capture \"read_memory 0x20000000 32 2\"", ok("0xdeadbeef 0x1")),
    ]);

    let mut ocd = Openocd::new(script);
    ocd.write_memory(0x2000_0000, Width::W32, &written).unwrap();
    let read = ocd.read_memory(0x2000_0000, Width::W32, 2).unwrap();
    assert_eq!(read, written);
    assert_eq!(read, vec![3735928559, 1]);
}

#[test]
fn test_word_convenience_calls() {
    let script = Script::new(vec![
        ("capture \"mww 0x40021018 0x4\"", ok("")),
        ("capture \"write_memory 0x40021018 32 {0x4}\"", ok("")),
        ("capture \"read_memory 0x40021018 32 1\"", ok("0x4")),
    ]);

    let mut ocd = Openocd::new(script);
    ocd.mww(0x4002_1018, 0x4).unwrap();
    ocd.write_word(0x4002_1018, 0x4).unwrap();
    assert_eq!(ocd.read_word(0x4002_1018).unwrap(), 4);
}

#[test]
fn test_firmware_load_flow() {
    let script = Script::new(vec![
        ("capture \"reset halt\"", ok("target halted due to debug-request")),
        (
            "load_image \"build/app.bin\" 0x20000000 bin",
            ok("524 bytes written at address 0x20000000\ndownloaded 524 bytes in 0.011719s (43.667 KiB/s)"),
        ),
        ("capture \"resume 0x20000000\"", ok("")),
    ]);

    let mut ocd = Openocd::new(script);
    ocd.reset_halt().unwrap();
    let options = LoadImageOptions {
        format: Some(ImageFormat::Bin),
        ..Default::default()
    };
    let loaded = ocd.load_image("build/app.bin", 0x2000_0000, options).unwrap();
    assert!(loaded.contains("524 bytes written"));
    ocd.resume(Some(0x2000_0000)).unwrap();
    assert!(ocd.get_ref().finished());
}

#[test]
fn test_load_image_windows_path_escaping() {
    let script = Script::new(vec![(
        r#"load_image "C:\\builds\\fw.bin" 0x8000000 bin 0x8000000 0x1000"#,
        ok("4096 bytes written at address 0x08000000"),
    )]);

    let mut ocd = Openocd::new(script);
    let options = LoadImageOptions {
        format: Some(ImageFormat::Bin),
        min_address: Some(0x0800_0000),
        max_length: Some(0x1000),
    };
    ocd.load_image(r"C:\builds\fw.bin", 0x0800_0000, options)
        .unwrap();
}

#[test]
fn test_inspection_flow() {
    let script = Script::new(vec![
        (
            "capture \"targets\"",
            ok("    TargetName         Type       Endian TapName            State       \n--  ------------------ ---------- ------ ------------------ ------------\n 0* stm32f4x.cpu       hla_target little stm32f4x.cpu       halted"),
        ),
        ("capture \"reg pc\"", ok("pc (/32): 0x080001c4")),
        (
            "capture \"mdw 0x10000000 2\"",
            ok("0x10000000: deadbeef cafebabe"),
        ),
    ]);

    let mut ocd = Openocd::new(script);
    let table = ocd.targets().unwrap();
    assert!(table.contains("halted"));
    assert_eq!(ocd.reg("pc").unwrap(), 0x0800_01c4);
    assert_eq!(ocd.mdw(0x1000_0000, 2).unwrap(), vec![0xdeadbeef, 0xcafebabe]);
}

#[test]
fn test_breakpoint_flow() {
    let script = Script::new(vec![
        (
            "capture \"bp 0x80001c4 2 hw\"",
            ok("breakpoint set at 0x080001c4"),
        ),
        ("capture \"rbp 0x80001c4\"", ok("")),
    ]);

    let mut ocd = Openocd::new(script);
    ocd.bp(0x0800_01c4, 2, true).unwrap();
    ocd.rbp(0x0800_01c4).unwrap();
    assert!(ocd.get_ref().finished());
}

#[test]
fn test_step_flow() {
    let script = Script::new(vec![
        ("capture \"step\"", ok("target halted due to single-step")),
        ("capture \"step 0x80001c8\"", ok("target halted due to single-step")),
    ]);

    let mut ocd = Openocd::new(script);
    ocd.step(None).unwrap();
    ocd.step(Some(0x0800_01c8)).unwrap();
}

#[test]
fn test_daemon_error_passes_through() {
    let script = Script::new(vec![(
        "capture \"mww 0x1 0x2\"",
        Err(TclError::Daemon(
            "Failed to write memory at 0x00000001".to_string(),
        )),
    )]);

    let mut ocd = Openocd::new(script);
    let err = ocd.mww(0x1, 0x2).unwrap_err();
    match &err {
        TclError::Daemon(text) => assert_eq!(text, "Failed to write memory at 0x00000001"),
        other => panic!("expected Daemon error, got {:?}", other),
    }
    assert_eq!(err.to_string(), "OpenOCD error: Failed to write memory at 0x00000001");
}

#[test]
fn test_timeout_error_passes_through() {
    let script = Script::new(vec![("capture \"reset halt\"", Err(TclError::Timeout))]);

    let mut ocd = Openocd::new(script);
    assert!(matches!(ocd.reset_halt(), Err(TclError::Timeout)));
}

#[test]
fn test_boxed_dyn_transport() {
    let script = Script::new(vec![("capture \"halt\"", ok(""))]);
    let boxed: Box<dyn TclRpc> = Box::new(script);

    let mut ocd = Openocd::new(boxed);
    ocd.halt().unwrap();
}

#[test]
fn test_raw_command_escape_hatch() {
    // Commands without a typed method go through the TclRpc impl verbatim.
    let script = Script::new(vec![(
        "adapter speed 4000",
        ok("adapter speed: 4000 kHz"),
    )]);

    let mut ocd = Openocd::new(script);
    let reply = ocd.run("adapter speed 4000").unwrap();
    assert_eq!(reply, "adapter speed: 4000 kHz");
}

#[test]
fn test_error_display_strings() {
    let error = TclError::ConnectionClosed;
    assert_eq!(error.to_string(), "Connection closed by OpenOCD");

    let error = TclError::MalformedReply {
        reply: "junk".to_string(),
        reason: "invalid hex token: invalid digit found in string".to_string(),
    };
    assert!(error.to_string().contains("Malformed reply"));
    assert!(error.to_string().contains("junk"));
}
