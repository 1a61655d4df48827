//! Text rendering for the four screens.
//!
//! Every function here is pure: it reads a [`Session`] and returns the
//! text to print, so screens can be tested without a terminal.

use mart_core::Session;
use mart_core::types::{Category, Difficulty, GameItem, GamePhase};

/// Lobby facts that live outside the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LobbyStatus {
    /// A background fetch is running.
    pub prefetching: bool,
    /// A scenario for the current selection is ready.
    pub ready: bool,
    /// An API key is configured.
    pub has_key: bool,
}

const RULE: &str = "────────────────────────────────────────";

/// Render whatever screen the session is on.
#[must_use]
pub fn render(session: &Session, status: LobbyStatus) -> String {
    match session.phase() {
        GamePhase::Lobby => render_lobby(session, status),
        GamePhase::Observation => render_observation(session),
        GamePhase::FillGaps => render_fill(session),
        GamePhase::Result => render_result(session),
    }
}

/// Category and difficulty pickers plus the start prompt.
#[must_use]
pub fn render_lobby(session: &Session, status: LobbyStatus) -> String {
    let mut out = vec![
        "🛒 메모리 마트".to_string(),
        RULE.to_string(),
        "어디서 쇼핑을 할까요?".to_string(),
    ];
    for (i, category) in Category::all().iter().enumerate() {
        out.push(format!(
            "  {} {}. {} {}",
            marker(*category == session.category()),
            i + 1,
            category.icon(),
            category.label()
        ));
    }
    out.push(String::new());
    out.push("난이도를 선택해 주세요".to_string());
    for (i, difficulty) in Difficulty::all().iter().enumerate() {
        out.push(format!(
            "  {} {}. {} ({}개)",
            marker(*difficulty == session.difficulty()),
            i + 1,
            difficulty.label(),
            difficulty.item_count()
        ));
    }
    out.push(String::new());
    out.push("▶ 쇼핑 시작! (start)".to_string());
    if status.prefetching {
        out.push("  카트를 소독하고 있어요...".to_string());
    } else if status.ready {
        out.push("  상품 진열 완료!".to_string());
    }
    if !status.has_key {
        out.push("⚙️ API 키가 없어요. 'key set <키>'로 등록해 주세요.".to_string());
    }
    out.join("\n")
}

/// The ordered items with the countdown.
#[must_use]
pub fn render_observation(session: &Session) -> String {
    let mut out = Vec::new();
    if let Some(scenario) = session.scenario() {
        out.push(format!("🏪 {}", scenario.theme));
    }
    out.push(format!("⏰ 남은 시간: {}초", session.timer()));
    out.push(RULE.to_string());
    out.push("아래 물건들이 담길 [순서]를 꼭 기억하세요!".to_string());
    if let Some(scenario) = session.scenario() {
        for (i, item) in scenario.items.iter().enumerate() {
            out.push(format!("  {}번  {}", i + 1, item_line(item)));
        }
    }
    out.push(String::new());
    out.push("(skip: 바로 시작)".to_string());
    out.join("\n")
}

/// Cart slots, the shelf, and the hint overlay when it is up.
#[must_use]
pub fn render_fill(session: &Session) -> String {
    let mut out = Vec::new();

    if session.hint_visible() {
        out.push("⚠️ 잠깐 확인하세요!".to_string());
        if let Some(scenario) = session.scenario() {
            for (i, item) in scenario.items.iter().enumerate() {
                out.push(format!("  {}번  {} {}", i + 1, item.icon, item.name));
            }
        }
        out.push(RULE.to_string());
    }

    out.push("🛒 장바구니를 채워주세요!".to_string());
    for (i, slot) in session.answers().iter().enumerate() {
        let content = match slot {
            Some(item) => format!("{} {}  [빼기: remove {}]", item.icon, item.name, i + 1),
            None => "______".to_string(),
        };
        out.push(format!("  {}번째 상품: {content}", i + 1));
    }

    out.push(String::new());
    out.push("매장 진열대 (번호를 입력해 카트에 담으세요)".to_string());
    for (i, item) in session.options().iter().enumerate() {
        let taken = if session.is_used(&item.id) { "  ✔ 담음" } else { "" };
        out.push(format!("  {:>2}. {}{taken}", i + 1, item_line(item)));
    }

    out.push(String::new());
    if session.difficulty().hints_allowed() {
        let hint = if session.hints_remaining() > 0 { "힌트 보기 (hint)" } else { "힌트 사용완료" };
        out.push(hint.to_string());
    }
    if session.is_complete() {
        out.push("💳 계산하기 (check)".to_string());
    }
    out.join("\n")
}

/// Score, grade message, and the receipt.
#[must_use]
pub fn render_result(session: &Session) -> String {
    let mut out = Vec::new();
    if let Some(grade) = session.grade() {
        out.push(grade.emoji().to_string());
        out.push(format!("총 {}개 성공!", session.score()));
        out.extend(grade.message().lines().map(str::to_string));
    }
    out.push(RULE.to_string());
    out.push("영수증 확인하기".to_string());
    for (i, line) in session.receipt().iter().enumerate() {
        let mark = if line.correct { "⭕" } else { "❌" };
        let placed = line
            .placed
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| format!("{} {}", p.icon, p.name));
        out.push(format!(
            "  {}번  {mark}  정답 {} {}  / 담은 것 {placed}",
            i + 1,
            line.target.icon,
            line.target.name
        ));
    }
    out.push(String::new());
    out.push("🔄 다시하기 (retry)   ⚙️ 레벨변경 (home)".to_string());
    out.join("\n")
}

/// Command reference.
#[must_use]
pub fn help() -> &'static str {
    "명령어:
  category <번호|이름>   쇼핑 장소 고르기
  difficulty <번호|이름> 난이도 고르기
  start                  쇼핑 시작
  skip                   기억하기 건너뛰기
  <번호>                 진열대 상품 담기
  remove <번호>          장바구니에서 빼기
  hint                   힌트 보기 (보통/어려움)
  check                  계산하기
  retry / home           다시하기 / 처음으로
  key set <키> | key clear | key test
  quit                   종료"
}

fn marker(selected: bool) -> &'static str {
    if selected { "●" } else { "○" }
}

fn item_line(item: &GameItem) -> String {
    if item.description.is_empty() {
        format!("{} {}", item.icon, item.name)
    } else {
        format!("{} {} ({})", item.icon, item.name, item.description)
    }
}
