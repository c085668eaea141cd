use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a Command for chatlens
pub fn chatlens() -> Command {
    cargo_bin_cmd!("chatlens")
}

/// Config that keeps every path inside `dir` and never sleeps
pub const TEST_CONFIG: &str = r#"
[input]
transcripts = "data/chats.json"

[output]
spreadsheet = "outputs/chat_analysis.xlsx"
swot = "outputs/swot_analysis.txt"
recommendations = "outputs/recommendations.txt"
demand_summary = "outputs/demand_summary.txt"
accuracy_report = "outputs/accuracy_report.txt"
records = "outputs/records.json"

[classifier]
api_key_env = "CHATLENS_TEST_UNSET_KEY"
system_prompt_path = "prompts/system_prompt.txt"

[batch]
pause_ms = 0
"#;

/// Four labeled chats: two shipping, one payment, one refund
pub fn export_json() -> String {
    let chats = [
        ("C-01", "Çözüldü", "Pozitif", "Soru", "Kargo", "Kargo takibi"),
        ("C-02", "Çözülemedi", "Negatif", "Şikayet", "Kargo", "Geciken kargo"),
        ("C-03", "Çözüldü", "Nötr", "Sorun", "Ödeme", "Kart reddedildi"),
        ("C-04", "Çözüldü", "Pozitif", "İstek", "İade", "İade talebi"),
    ];
    let values: Vec<serde_json::Value> = chats
        .iter()
        .map(|(id, res, sent, kind, intent, detail)| {
            serde_json::json!({
                "sohbet_id": id,
                "tarih_saat": "05.03.2025 14:00:00",
                "mesajlar": [
                    {"sender": "Müşteri", "text": "Merhaba", "timestamp": "05.03.2025 14:00:00"},
                    {"sender": "Mila", "text": "Size nasıl yardımcı olabilirim?", "timestamp": "05.03.2025 14:01:30"}
                ],
                "yanit_durumu": res,
                "sentiment": sent,
                "tur": kind,
                "intent": intent,
                "intent_detay": detail
            })
        })
        .collect();
    serde_json::to_string_pretty(&values).unwrap()
}

/// Temp workspace with `chatlens.toml` and `data/chats.json`
pub fn setup_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("chatlens.toml"), TEST_CONFIG).unwrap();
    write_file(dir.path(), "data/chats.json", &export_json());
    dir
}

/// Run `analyze --offline` in a workspace, asserting success
#[allow(dead_code)]
pub fn analyze_offline(dir: &TempDir) {
    chatlens()
        .current_dir(dir.path())
        .args(["analyze", "--offline"])
        .assert()
        .success();
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
