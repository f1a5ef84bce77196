//! Prompt construction for daily fortunes.
//!
//! Every prompt is `persona + inputs + FORMAT_INSTRUCTION`. The persona varies
//! by mode; the format instruction never does.

use crate::fortune::models::{Mode, ValidatedRequest};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// The exact key set the provider must return, in schema order.
pub const RESULT_KEYS: [&str; 6] = [
    "overall",
    "love",
    "work",
    "luckyItem",
    "luckyColor",
    "rating",
];

/// Per-field length ceiling, in characters.
pub const MAX_FIELD_CHARS: usize = 50;

/// Baseline persona: a sardonic veteran fortune teller who still reads honestly.
const NORMAL_PERSONA: &str = "\
あなたは皮肉をよく言うベテラン占い師です。
与えられた情報をもとに今日の運勢を素直に占ってください。";

/// "Yumekawa" persona: dreamy, pastel, sugary-cute phrasing.
const YUMEKAWA_PERSONA: &str = "\
あなたはゆめかわいい世界に住む、やさしくてふわふわした占い師です。
パステルカラーや星、ユニコーンのような甘くて夢っぽい言葉づかいで、
今日の運勢をキラキラと楽しく占ってください。";

/// Persona lookup table. Modes not listed here use `NORMAL_PERSONA`.
const PERSONAS: &[(Mode, &str)] = &[
    (Mode::Normal, NORMAL_PERSONA),
    (Mode::Yumekawa, YUMEKAWA_PERSONA),
];

/// Input block template. Replace `{birth_date}` and `{blood_type}` before sending.
const INPUT_TEMPLATE: &str = "\
- 生年月日: {birth_date}
- 血液型: {blood_type}";

/// Output contract appended to every prompt regardless of persona.
/// Replace `{max_chars}` before sending.
const FORMAT_INSTRUCTION: &str = r#"占い結果は与えられた情報を繰り返さず、各項目{max_chars}字以内で簡潔にまとめてください。

回答は次のキーを持つJSONオブジェクトひとつだけにしてください。キーの追加・省略は禁止です。
{"overall":"総合運","love":"恋愛運","work":"仕事運","luckyItem":"ラッキーアイテム","luckyColor":"ラッキーカラー","rating":1から100までの整数}
"rating" は 1 以上 100 以下の整数（引用符なし）にしてください。"#;

/// Returns the persona text for a mode.
pub fn persona_for(mode: Mode) -> &'static str {
    PERSONAS
        .iter()
        .find(|(m, _)| *m == mode)
        .map(|(_, text)| *text)
        .unwrap_or(NORMAL_PERSONA)
}

/// Builds the full provider prompt for a validated request.
pub fn build_prompt(req: &ValidatedRequest) -> String {
    let inputs = INPUT_TEMPLATE
        .replace("{birth_date}", &req.birth_date)
        .replace("{blood_type}", req.blood_type.as_str());
    let format = FORMAT_INSTRUCTION.replace("{max_chars}", &MAX_FIELD_CHARS.to_string());

    format!(
        "{persona}\n{inputs}\n\n{format}\n{json_only}",
        persona = persona_for(req.mode),
        json_only = JSON_ONLY_INSTRUCTION,
    )
}
