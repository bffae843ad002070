use clap::Parser;

use deskflow_cli::{Cli, Command};

#[test]
fn submit_parses_subject_and_model() {
    let cli = Cli::try_parse_from([
        "deskflow",
        "submit",
        "--subject",
        "Need a laptop for fieldwork",
        "--model",
        "Latitude-E5580",
    ])
    .expect("valid submit invocation");

    match cli.command {
        Command::Submit { subject, model, for_emp, .. } => {
            assert_eq!(subject, "Need a laptop for fieldwork");
            assert_eq!(model, "Latitude-E5580");
            assert_eq!(for_emp, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn recipient_name_requires_recipient_emp() {
    let result = Cli::try_parse_from([
        "deskflow",
        "submit",
        "--subject",
        "s",
        "--model",
        "m",
        "--for-name",
        "Someone Else",
    ]);
    assert!(result.is_err(), "--for-name without --for-emp must be rejected");
}

#[test]
fn decide_accepts_task_id_and_verdict() {
    let cli = Cli::try_parse_from([
        "deskflow",
        "decide",
        "T1",
        "--reject",
        "--remarks",
        "duplicate request",
    ])
    .expect("valid decide invocation");

    match cli.command {
        Command::Decide { task_id, approve, reject, remarks } => {
            assert_eq!(task_id, "T1");
            assert!(!approve);
            assert!(reject);
            assert_eq!(remarks, "duplicate request");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn approve_and_reject_conflict() {
    let result = Cli::try_parse_from(["deskflow", "decide", "T1", "--approve", "--reject"]);
    assert!(result.is_err(), "--approve and --reject are mutually exclusive");
}

#[test]
fn json_flag_is_global() {
    let cli = Cli::try_parse_from(["deskflow", "queue", "--json"]).expect("global flag position");
    assert!(cli.json);
    assert!(matches!(cli.command, Command::Queue { emp: None }));
}
