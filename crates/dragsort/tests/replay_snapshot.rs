use dragsort::app::replay::{self, ReplayOptions, Script, ScriptFormat};
use insta::assert_snapshot;

const BOARD: &str = r#"
lists:
  - name: backlog
    group: tasks
    handle: ".grip"
    items: [write, review]
    template:
      - tag: span
        class: [grip]
  - name: done
    group: tasks
    items: [ship]
  - name: archive
    source_only: true
    items: [old]
events:
  - { kind: start, list: backlog, item: 1 }
  - { kind: start, list: backlog, item: 1, target: ".grip" }
  - { kind: hover, list: archive, item: 0 }
  - { kind: hover, list: done, item: 0 }
  - { kind: hover, list: backlog }
  - { kind: end }
  - { kind: end }
"#;

#[test]
fn board_replay_transitions() {
    let script = Script::parse(BOARD, ScriptFormat::Yaml).unwrap();
    let report = replay::run(&script, &ReplayOptions::default()).unwrap();

    assert_snapshot!(report.transitions.join("\n"), @r"
    ignored (unauthorized-start)
    started backlog[1]
    ignored (ineligible-hover-target)
    retargeted done[0]
    ignored (not-an-item)
    emitted
    ignored (no-active-session)
    ");

    let instruction = &report.instructions[0];
    assert_eq!(instruction.group.as_deref(), Some("tasks"));
    assert_eq!(instruction.dragged_item, "review");
    assert_eq!(instruction.source_list, "backlog");
    assert_eq!(instruction.target_list, "done");
}

#[test]
fn bundled_demos_replay_cleanly() {
    let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let mut emitted = Vec::new();
    for name in ["basic.yaml", "nested-handle.yaml", "kanban.json"] {
        let script = Script::from_path(&demos.join(name)).unwrap();
        let report = replay::run(&script, &ReplayOptions::default()).unwrap();
        emitted.push((name, report.instructions.len()));
    }
    assert_eq!(
        emitted,
        vec![("basic.yaml", 1), ("nested-handle.yaml", 1), ("kanban.json", 1)]
    );
}
