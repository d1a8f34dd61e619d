use std::path::PathBuf;

use serde_json::Value;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_tweenschema")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "tweenschema.exe"
            } else {
                "tweenschema"
            });
            p
        })
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[test]
fn cli_translate_writes_schema_and_names_state() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let out_path = dir.join("out.json");
    let names_path = dir.join("names.json");
    let _ = std::fs::remove_file(&out_path);
    let _ = std::fs::remove_file(&names_path);

    let out_arg = out_path.to_string_lossy().to_string();
    let names_arg = names_path.to_string_lossy().to_string();
    let run = || {
        std::process::Command::new(exe())
            .args(["translate", "--in", "tests/data/scene_basic.json", "--out"])
            .arg(out_arg.as_str())
            .args(["--names", names_arg.as_str()])
            .status()
            .unwrap()
    };

    assert!(run().success());
    let want: Value =
        serde_json::from_str(include_str!("data/scene_basic.schema.json")).unwrap();
    assert_eq!(read_json(&out_path), want);
    assert_eq!(read_json(&names_path)["M2"], 1);

    // Persisted state carries numbering into the next run.
    assert!(run().success());
    let second = read_json(&out_path);
    assert_eq!(second["animations"]["M1"]["animations"][0]["bn"], "bn_M2_1");
    assert_eq!(read_json(&names_path)["M2"], 2);
}

#[test]
fn cli_check_accepts_valid_and_rejects_broken_graphs() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let ok = std::process::Command::new(exe())
        .args(["check", "--in", "tests/data/scene_basic.json"])
        .status()
        .unwrap();
    assert!(ok.success());

    let broken = dir.join("broken.json");
    std::fs::write(
        &broken,
        r#"{"nodes": [{"id": "C", "type": "container", "data": {"children": ["missing"]}}]}"#,
    )
    .unwrap();
    let out = std::process::Command::new(exe())
        .args(["check", "--in"])
        .arg(broken.to_string_lossy().as_ref())
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("reference to unknown node 'missing'"));
}
