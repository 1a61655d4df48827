//! The event loop: one-second ticks, typed commands, and the glue between
//! the session, the key store and the scenario generator.

use std::io::{BufRead, Write};
use std::time::Duration;

use mart_core::error::MartError;
use mart_core::keystore::KeyStore;
use mart_core::types::{GamePhase, Scenario};
use mart_core::{MartConfig, Session};
use mart_llm::{LlmClient, LlmError, Prefetcher, ScenarioGenerator};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::commands::{self, Command};
use crate::screens::{self, LobbyStatus};

const GENERATION_FAILED: &str =
    "상품을 진열하는 중 오류가 발생했습니다. API 키가 등록되어 있지 않거나 잘못되었습니다.";

/// Whether the loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input.
    Continue,
    /// Leave the game.
    Quit,
}

/// Game state plus everything the front end needs to drive it.
pub struct App {
    config: MartConfig,
    session: Session,
    keystore: KeyStore,
    prefetcher: Prefetcher,
    has_key: bool,
    rng: StdRng,
    notice: Option<String>,
    last_status: LobbyStatus,
    realign_clock: bool,
}

impl App {
    /// Build the app from config, resolving the API key through `keystore`.
    ///
    /// # Errors
    /// Fails on an unknown `[llm] provider`.
    pub fn new(config: MartConfig, keystore: KeyStore) -> Result<Self, LlmError> {
        Self::with_rng(config, keystore, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new) with a caller-supplied shuffle source.
    ///
    /// # Errors
    /// Fails on an unknown `[llm] provider`.
    pub fn with_rng(config: MartConfig, keystore: KeyStore, rng: StdRng) -> Result<Self, LlmError> {
        let key = keystore.resolve(None);
        let has_key = key.is_some();
        let generator = build_generator(&config, key)?;
        Ok(Self {
            session: Session::new(&config.game),
            prefetcher: Prefetcher::new(generator),
            config,
            keystore,
            has_key,
            rng,
            notice: None,
            last_status: LobbyStatus::default(),
            realign_clock: false,
        })
    }

    /// Swap the scenario generator, e.g. to point at another endpoint.
    pub fn set_generator(&mut self, generator: ScenarioGenerator) {
        self.prefetcher.clear();
        self.prefetcher = Prefetcher::new(generator);
        self.has_key = true;
    }

    /// The game session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Last message for the player, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether a prefetched scenario is waiting for the current selection.
    #[must_use]
    pub fn has_prefetched(&self) -> bool {
        self.prefetcher.is_ready(self.session.difficulty(), self.session.category())
    }

    fn lobby_status(&self) -> LobbyStatus {
        LobbyStatus {
            prefetching: self.prefetcher.is_fetching(),
            ready: self.has_prefetched(),
            has_key: self.has_key,
        }
    }

    /// Full screen text including the notice line.
    #[must_use]
    pub fn screen(&self) -> String {
        let body = screens::render(&self.session, self.lobby_status());
        match &self.notice {
            Some(notice) => format!("{body}\n\n💬 {notice}"),
            None => body,
        }
    }

    /// Kick off a background fetch for the lobby selection. Does nothing
    /// outside the lobby.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request_prefetch(&self) {
        if self.session.phase() != GamePhase::Lobby {
            return;
        }
        if !self.config.llm.prefetch || !self.has_key {
            return;
        }
        if !self.prefetcher.generator().client().is_available() {
            return;
        }
        let _ = self.prefetcher.request(self.session.difficulty(), self.session.category());
    }

    /// Whether a countdown just began (round start or hint overlay), so the
    /// driver must restart its one-second clock. Reading clears the flag.
    pub fn take_clock_realign(&mut self) -> bool {
        std::mem::take(&mut self.realign_clock)
    }

    /// Advance the clock one second. Returns whether the screen changed.
    pub fn on_tick(&mut self) -> bool {
        match self.session.phase() {
            GamePhase::Observation => {
                self.session.tick();
                true
            }
            GamePhase::FillGaps => {
                let before = self.session.hint_visible();
                self.session.tick();
                before != self.session.hint_visible()
            }
            GamePhase::Lobby => {
                let status = self.lobby_status();
                let changed = status != self.last_status;
                self.last_status = status;
                changed
            }
            GamePhase::Result => false,
        }
    }

    /// Parse and run one input line.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match commands::parse(line) {
            Ok(command) => self.handle(command).await,
            Err(commands::CommandError::Empty) => Flow::Continue,
            Err(e) => {
                self.notice = Some(format!("알 수 없는 입력이에요 ({e}). 'help'를 입력해 보세요."));
                Flow::Continue
            }
        }
    }

    /// Run one command against the session.
    pub async fn handle(&mut self, command: Command) -> Flow {
        self.notice = None;
        debug!(?command, phase = ?self.session.phase(), "command");
        let result = match command {
            Command::Quit => return Flow::Quit,
            Command::Help => {
                self.notice = Some(screens::help().to_string());
                Ok(())
            }
            Command::SelectDifficulty(difficulty) => {
                let r = self.session.select_difficulty(difficulty);
                self.request_prefetch();
                r
            }
            Command::SelectCategory(category) => {
                let r = self.session.select_category(category);
                self.request_prefetch();
                r
            }
            Command::Start => {
                if self.session.phase() == GamePhase::Lobby {
                    self.start_round().await;
                    Ok(())
                } else {
                    Err(MartError::InvalidTransition { from: self.session.phase(), action: "start" })
                }
            }
            Command::Retry => {
                if self.session.phase() == GamePhase::Result {
                    self.start_round().await;
                    Ok(())
                } else {
                    Err(MartError::InvalidTransition { from: self.session.phase(), action: "retry" })
                }
            }
            Command::Skip => self.session.skip_observation(),
            Command::Pick(index) => self.pick(index),
            Command::Remove(slot) => self.session.remove(slot).map(|_| ()),
            Command::Hint => {
                let r = self.session.use_hint();
                if r.is_ok() {
                    self.realign_clock = true;
                }
                r
            }
            Command::Check => self.session.check().map(|_| ()),
            Command::Home => {
                self.session.go_home();
                self.request_prefetch();
                Ok(())
            }
            Command::KeySet(key) => self.save_key(&key),
            Command::KeyClear => self.clear_key(),
            Command::KeyTest => {
                let ok = self.prefetcher.generator().test_connection().await;
                self.notice = Some(self.key_test_message(ok));
                Ok(())
            }
        };
        if let Err(e) = result {
            self.notice = Some(describe(&e));
        }
        Flow::Continue
    }

    fn pick(&mut self, index: usize) -> Result<(), MartError> {
        if self.session.phase() != GamePhase::FillGaps {
            return Err(MartError::InvalidTransition { from: self.session.phase(), action: "place an item" });
        }
        let Some(item) = self.session.options().get(index) else {
            return Err(MartError::UnknownItem(format!("#{}", index + 1)));
        };
        let id = item.id.clone();
        if self.session.place(&id)?.is_none() {
            self.notice = Some(if self.session.is_used(&id) {
                "이미 카트에 담은 상품이에요.".to_string()
            } else {
                "장바구니가 가득 찼어요. 'check'로 계산하세요.".to_string()
            });
        }
        Ok(())
    }

    fn key_test_message(&self, ok: bool) -> String {
        if !ok {
            return "❌ 연결 실패. 키를 확인해 주세요.".to_string();
        }
        match self.keystore.saved_at() {
            Some(at) => format!("✅ 연결 성공! (키 저장일: {})", at.format("%Y-%m-%d")),
            None => "✅ 연결 성공!".to_string(),
        }
    }

    /// Begin a round with `scenario` and ask the driver to realign its clock.
    ///
    /// # Errors
    /// Illegal phase or an unplayable scenario.
    pub fn begin_round(&mut self, scenario: Scenario) -> Result<(), MartError> {
        self.session.start(scenario, &mut self.rng)?;
        self.realign_clock = true;
        Ok(())
    }

    async fn start_round(&mut self) {
        let (difficulty, category) = (self.session.difficulty(), self.session.category());
        let scenario = match self.prefetcher.take(difficulty, category) {
            Some(scenario) => {
                debug!("using prefetched scenario");
                scenario
            }
            None => match self.prefetcher.generator().generate(difficulty, category).await {
                Ok(scenario) => scenario,
                Err(e) => {
                    warn!("scenario generation failed: {e}");
                    self.notice = Some(if e.needs_key_setup() || matches!(e, LlmError::Unavailable(_)) {
                        format!("{GENERATION_FAILED}\n'key set <키>'로 등록해 주세요.")
                    } else {
                        format!("{GENERATION_FAILED}\n({e})")
                    });
                    return;
                }
            },
        };
        if let Err(e) = self.begin_round(scenario) {
            self.notice = Some(describe(&e));
        }
    }

    fn save_key(&mut self, key: &str) -> Result<(), MartError> {
        self.keystore.save(key)?;
        self.rebuild_client(Some(key.trim().to_string()))?;
        self.notice = Some("API 키가 안전하게 저장되었습니다.".into());
        Ok(())
    }

    fn clear_key(&mut self) -> Result<(), MartError> {
        self.keystore.clear()?;
        let fallback = self.keystore.resolve(None);
        self.rebuild_client(fallback)?;
        self.notice = Some("키 설정이 초기화되었습니다. 'key set <키>'로 새 키를 등록해 주세요.".into());
        Ok(())
    }

    fn rebuild_client(&mut self, key: Option<String>) -> Result<(), MartError> {
        self.has_key = key.is_some();
        let generator =
            build_generator(&self.config, key).map_err(|e| MartError::Config(e.to_string()))?;
        self.prefetcher.clear();
        self.prefetcher = Prefetcher::new(generator);
        self.request_prefetch();
        Ok(())
    }
}

fn build_generator(config: &MartConfig, key: Option<String>) -> Result<ScenarioGenerator, LlmError> {
    let client = LlmClient::from_config(&config.llm, key)?;
    Ok(ScenarioGenerator::new(client, config.llm.request_timeout_ms))
}

/// Player-facing wording for core errors.
fn describe(e: &MartError) -> String {
    match e {
        MartError::IncompleteAnswers { empty } => format!("빈 칸이 {empty}개 남았어요. 모두 채워주세요!"),
        MartError::HintUnavailable(_) => "힌트를 사용할 수 없어요.".to_string(),
        MartError::SlotOutOfRange { len, .. } => format!("1번부터 {len}번 사이에서 골라주세요."),
        MartError::UnknownItem(_) => "진열대에 없는 번호예요.".to_string(),
        MartError::InvalidTransition { .. } => "지금은 할 수 없는 동작이에요.".to_string(),
        other => other.to_string(),
    }
}

/// Forward stdin lines to `tx` until EOF or the receiver goes away.
/// Runs on a plain thread; a pending read must not hold up runtime shutdown.
fn spawn_stdin_reader(tx: mpsc::Sender<String>) -> std::io::Result<()> {
    std::thread::Builder::new().name("stdin-reader".into()).spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    })?;
    Ok(())
}

fn draw(app: &App) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "\x1b[2J\x1b[H{}\n\n> ", app.screen())?;
    out.flush()
}

/// The one-second clock that drives countdowns.
#[must_use]
pub fn countdown_clock() -> Interval {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Run the game until `quit` or end of input.
///
/// # Errors
/// Only terminal write failures end the loop with an error.
pub async fn run(mut app: App) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<String>(16);
    spawn_stdin_reader(tx)?;

    let mut ticker = countdown_clock();
    ticker.tick().await;

    app.request_prefetch();
    draw(&app)?;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if app.on_tick() {
                    draw(&app)?;
                }
            }
            line = rx.recv() => {
                let Some(line) = line else { break };
                if matches!(commands::parse(&line), Ok(Command::Start | Command::Retry))
                    && !app.has_prefetched()
                {
                    let mut out = std::io::stdout().lock();
                    writeln!(out, "상품 준비 중...")?;
                    out.flush()?;
                }
                if app.handle_line(&line).await == Flow::Quit {
                    break;
                }
                if app.take_clock_realign() {
                    ticker.reset();
                }
                draw(&app)?;
            }
        }
    }
    info!("bye");
    Ok(())
}
