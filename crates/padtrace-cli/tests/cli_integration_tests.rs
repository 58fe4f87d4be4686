use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test fixture with an input and an output directory.
struct TestFixture {
    _temp_dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");

        fs::create_dir_all(&input).expect("Failed to create input dir");
        fs::create_dir_all(&output).expect("Failed to create output dir");

        Self {
            _temp_dir: temp_dir,
            input,
            output,
        }
    }

    fn write_input(&self, name: &str, content: &str) {
        fs::write(self.input.join(name), content).expect("Failed to write input file");
    }

    fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.output.join(name)).expect("Failed to read output file")
    }

    fn command(&self) -> Command {
        Command::cargo_bin("padtrace").expect("Failed to find padtrace binary")
    }

    fn extract(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("extract")
            .arg("-i")
            .arg(&self.input)
            .arg("-o")
            .arg(&self.output);
        cmd
    }

    fn wf(&self, format: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("wf")
            .arg("-i")
            .arg(&self.input)
            .arg("-o")
            .arg(&self.output)
            .arg("-t")
            .arg(format);
        cmd
    }
}

fn log_line(timestamp: i64, cid: &str, event: &str) -> String {
    format!(
        "Nov 28 17:41:42.683 [info] circpad_trace_event(): \
         timestamp={timestamp} client_circ_id={cid} event={event}\n"
    )
}

fn sample_log() -> String {
    let mut log = String::from("Nov 28 17:41:40.000 [notice] Bootstrapped 100% (done)\n");
    // Circuit 1 only connects to a bare IP and must be filtered out.
    log.push_str(&log_line(1000, "1", "connection_ap_handshake_send_begin 1.2.3.4"));
    log.push_str(&log_line(1100, "1", "circpad_cell_event_nonpadding_sent"));
    // Circuit 2 resolved a domain and wins.
    log.push_str(&log_line(2000, "2", "connection_ap_handshake_send_begin example.com"));
    log.push_str(&log_line(2100, "2", "circpad_cell_event_nonpadding_sent"));
    log.push_str(&log_line(2300, "2", "circpad_cell_event_nonpadding_received"));
    log
}

#[test]
fn extract_writes_the_dominant_circuit_trace() {
    let fixture = TestFixture::new();
    fixture.write_input("site.log", &sample_log());

    fixture.extract().assert().success();

    let trace = fixture.read_output("site.log");
    assert_eq!(
        trace,
        "0000000000000000 connection_ap_handshake_send_begin example.com\n\
         0000000000000100 circpad_cell_event_nonpadding_sent\n\
         0000000000000300 circpad_cell_event_nonpadding_received\n"
    );
}

#[test]
fn extract_requires_existing_directories() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("extract")
        .arg("-i")
        .arg(fixture.input.join("missing"))
        .arg("-o")
        .arg(&fixture.output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn extract_never_overwrites_outputs() {
    let fixture = TestFixture::new();
    fixture.write_input("site.log", &sample_log());
    fs::write(fixture.output.join("site.log"), "old").unwrap();

    fixture
        .extract()
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    // The collision was detected pre-flight; the old file is untouched.
    assert_eq!(fixture.read_output("site.log"), "old");
}

#[test]
fn extract_fails_on_logs_without_circuits() {
    let fixture = TestFixture::new();
    fixture.write_input("quiet.log", "[notice] Tor starting\n[info] nothing\n");

    fixture
        .extract()
        .assert()
        .failure()
        .stderr(predicate::str::contains("quiet.log"));
}

#[test]
fn extract_warns_about_oversized_runner_ups() {
    let fixture = TestFixture::new();
    let mut log = String::new();
    for i in 0..200 {
        log.push_str(&log_line(i, "win", "circpad_cell_event_nonpadding_sent"));
    }
    for i in 0..150 {
        log.push_str(&log_line(1000 + i, "other", "circpad_cell_event_nonpadding_sent"));
    }
    fixture.write_input("busy.log", &log);

    fixture
        .extract()
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Warning: found extra circuit with 150 events",
        ));

    let trace = fixture.read_output("busy.log");
    assert_eq!(trace.lines().count(), 200);
}

#[test]
fn wf_encodes_cells() {
    let fixture = TestFixture::new();
    fixture.write_input(
        "site.trace",
        "0000000000000000 circpad_cell_event_nonpadding_sent\n\
         0000000000000100 circpad_cell_event_padding_received\n\
         0000000000000200 circpad_cell_event_nonpadding_received\n",
    );

    fixture.wf("cells").assert().success();
    assert_eq!(fixture.read_output("site.trace.cells"), "1\n-1\n-1\n");
}

#[test]
fn wf_honors_extension_override() {
    let fixture = TestFixture::new();
    fixture.write_input(
        "site.trace",
        "0000000000000000 circpad_cell_event_nonpadding_sent\n",
    );

    fixture
        .wf("dirtime")
        .arg("--extension")
        .arg("txt")
        .assert()
        .success();
    assert_eq!(fixture.read_output("site.trace.txt"), "0\n");
}

#[test]
fn wf_rejects_unknown_formats() {
    let fixture = TestFixture::new();
    fixture.wf("pkl").assert().failure();
}

#[test]
fn overhead_prints_a_report() {
    let fixture = TestFixture::new();
    fixture.write_input(
        "a.trace",
        "0000000000000000 circpad_cell_event_nonpadding_sent\n\
         0000000000000100 circpad_cell_event_padding_sent\n\
         0000000000000200 circpad_cell_event_nonpadding_received\n",
    );

    fixture
        .command()
        .arg("overhead")
        .arg("-i")
        .arg(&fixture.input)
        .assert()
        .success()
        .stdout(predicate::str::contains("for 1 traces, 3 cells in total"));
}

#[test]
fn overhead_writes_json_report() {
    let fixture = TestFixture::new();
    fixture.write_input(
        "a.trace",
        "0000000000000000 circpad_cell_event_nonpadding_sent\n\
         0000000000000200 circpad_cell_event_nonpadding_received\n",
    );
    let report_path = fixture.output.join("report.json");

    fixture
        .command()
        .arg("overhead")
        .arg("-i")
        .arg(&fixture.input)
        .arg("-o")
        .arg(&report_path)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["traces"], 1);
    assert_eq!(report["total_cells"], 2);
}

#[test]
fn overhead_rejects_broken_traces() {
    let fixture = TestFixture::new();
    fixture.write_input(
        "broken.trace",
        "0000000000000000 circpad_cell_event_nonpadding_sent\n",
    );

    fixture
        .command()
        .arg("overhead")
        .arg("-i")
        .arg(&fixture.input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken trace"));
}
