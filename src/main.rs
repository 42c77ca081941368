//! Folio Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_arcade {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent, MouseEvent};

    use folio_arcade::Arcade;
    use folio_arcade::audio::AudioManager;
    use folio_arcade::leaderboard::format_age;
    use folio_arcade::platform::{LocalStore, SystemClock};
    use folio_arcade::sim::bubble_pop::BubblePop;
    use folio_arcade::sim::color_pattern::{ColorPattern, TILE_COUNT};
    use folio_arcade::sim::whack_a_bug::{BugKind, HOLE_COUNT, WhackABug};
    use folio_arcade::sim::{AnyGame, GameKind, PlayerAction, SessionState};

    /// App instance holding all state
    struct App {
        arcade: Arcade<LocalStore, SystemClock>,
        audio: AudioManager,
        /// Leaderboard table needs re-rendering
        board_dirty: bool,
    }

    impl App {
        fn new(seed: u64) -> Self {
            let arcade = Arcade::open(LocalStore::new(), SystemClock, seed);
            let audio = AudioManager::new(arcade.settings());
            Self {
                arcade,
                audio,
                board_dirty: true,
            }
        }

        /// Advance timers and play feedback
        fn update(&mut self) {
            if self.arcade.update().is_some() {
                self.board_dirty = true;
            }
            self.flush_events();
        }

        fn act(&mut self, action: PlayerAction) {
            if self.arcade.act(&action).is_some() {
                self.board_dirty = true;
            }
            self.flush_events();
        }

        fn flush_events(&mut self) {
            for event in self.arcade.session_mut().drain_events() {
                self.audio.play(event);
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(doc: &Document, id: &str, hidden: bool) {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn escape_html(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    /// Update HUD and game surface in DOM
    fn render(app: &mut App) {
        let Some(doc) = document() else { return };
        let arcade = &app.arcade;
        let session = arcade.session();
        let state = session.state();

        set_text(&doc, "game-title", session.kind().display_name());
        set_text(&doc, "hud-score", &session.score().to_string());
        match session.game().time_left() {
            Some(secs) => set_text(&doc, "hud-time", &format!("{}s", secs)),
            None => set_text(&doc, "hud-time", ""),
        }
        set_hidden(&doc, "start-screen", state != SessionState::Idle);
        set_hidden(&doc, "game-over", !arcade.show_leaderboard_prompt());
        set_hidden(
            &doc,
            "new-best",
            !arcade.last_result().is_some_and(|r| r.new_best),
        );
        let best = arcade.best_for(session.kind()).unwrap_or(0);
        set_text(&doc, "best-score", &format!("High Score: {}", best));

        match session.game() {
            AnyGame::ColorPattern(g) => render_tiles(&doc, g),
            AnyGame::WhackABug(g) => render_holes(&doc, g),
            AnyGame::BubblePop(g) => render_bubbles(&doc, g),
            AnyGame::WordScramble(g) => {
                set_text(&doc, "scrambled", g.scrambled());
                set_text(&doc, "hint", g.hint());
            }
            AnyGame::CodeTyping(g) => set_text(&doc, "snippet", g.snippet()),
        }

        if app.board_dirty {
            render_leaderboard(&doc, arcade);
            app.board_dirty = false;
        }
    }

    fn render_tiles(doc: &Document, game: &ColorPattern) {
        set_text(doc, "level", &format!("Level {}", game.level()));
        for tile in 0..TILE_COUNT {
            if let Some(el) = doc.get_element_by_id(&format!("tile-{}", tile)) {
                let class = if game.lit_tile() == Some(tile) {
                    "tile lit"
                } else if game.accepts_input() {
                    "tile"
                } else {
                    "tile locked"
                };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    fn render_holes(doc: &Document, game: &WhackABug) {
        for (i, hole) in game.holes().iter().enumerate().take(HOLE_COUNT) {
            if let Some(el) = doc.get_element_by_id(&format!("hole-{}", i)) {
                let class = match hole {
                    None => "hole",
                    Some(BugKind::Normal) => "hole bug",
                    Some(BugKind::Golden) => "hole bug golden",
                    Some(BugKind::Bomb) => "hole bug bomb",
                };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    fn render_bubbles(doc: &Document, game: &BubblePop) {
        let Some(field) = doc.get_element_by_id("bubble-field") else {
            return;
        };
        let html: String = game
            .bubbles()
            .iter()
            .map(|b| {
                format!(
                    r#"<div id="bubble-{}" class="bubble" style="left:{:.0}px;top:{:.0}px;width:{:.0}px;height:{:.0}px">+{}</div>"#,
                    b.id, b.pos.x, b.pos.y, b.size, b.size, b.points
                )
            })
            .collect();
        field.set_inner_html(&html);
    }

    fn render_leaderboard(doc: &Document, arcade: &Arcade<LocalStore, SystemClock>) {
        let Some(body) = doc.get_element_by_id("leaderboard-body") else {
            return;
        };
        let now = arcade.now_ms();
        let highlight = arcade.last_result().and_then(|r| r.entry);
        let html: String = arcade
            .leaderboard()
            .entries()
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let class = if Some(e.timestamp) == highlight { "current" } else { "" };
                format!(
                    r#"<tr class="{}"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                    class,
                    i + 1,
                    escape_html(&e.name),
                    e.score,
                    escape_html(&e.game),
                    format_age(e.timestamp, now)
                )
            })
            .collect();
        body.set_inner_html(&html);

        if let Some(input) = doc
            .get_element_by_id("player-name")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            if input.value() != arcade.player_name() {
                input.set_value(arcade.player_name());
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Folio Arcade starting...");

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed)));

        setup_controls(app.clone());
        setup_game_input(app.clone());
        setup_auto_mute(app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Folio Arcade running!");
    }

    /// Attach a click handler to the element with `id`
    fn on_click(doc: &Document, id: &str, mut handler: impl FnMut(MouseEvent) + 'static) {
        if let Some(el) = doc.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| handler(event));
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_controls(app: Rc<RefCell<App>>) {
        let Some(doc) = document() else { return };

        {
            let app = app.clone();
            on_click(&doc, "start-btn", move |_| {
                app.borrow_mut().arcade.start();
            });
        }

        {
            let app = app.clone();
            on_click(&doc, "play-again-btn", move |_| {
                let mut a = app.borrow_mut();
                a.arcade.play_again();
                a.board_dirty = true;
            });
        }

        for kind in GameKind::ALL {
            let app = app.clone();
            on_click(&doc, &format!("tab-{}", kind.id()), move |_| {
                let mut a = app.borrow_mut();
                a.arcade.switch_game(kind);
                a.board_dirty = true;
            });
        }

        // Rename on every edit, like a controlled input
        if let Some(el) = doc.get_element_by_id("player-name") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.arcade.rename_player(&input.value());
                a.board_dirty = true;
            });
            let _ = el.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            on_click(&doc, "sound-toggle", move |_| {
                let mut a = app.borrow_mut();
                a.arcade.update_settings(|s| s.sound = !s.sound);
                let settings = a.arcade.settings().clone();
                a.audio.apply_settings(&settings);
            });
        }
    }

    fn setup_game_input(app: Rc<RefCell<App>>) {
        let Some(doc) = document() else { return };

        for tile in 0..TILE_COUNT {
            let app = app.clone();
            on_click(&doc, &format!("tile-{}", tile), move |_| {
                app.borrow_mut().act(PlayerAction::Tile(tile));
            });
        }

        for hole in 0..HOLE_COUNT {
            let app = app.clone();
            on_click(&doc, &format!("hole-{}", hole), move |_| {
                app.borrow_mut().act(PlayerAction::Whack(hole));
            });
        }

        // Bubbles are re-rendered every frame, so listen on the field
        {
            let app = app.clone();
            on_click(&doc, "bubble-field", move |event| {
                let id = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.id().strip_prefix("bubble-")?.parse::<u32>().ok());
                if let Some(id) = id {
                    app.borrow_mut().act(PlayerAction::Pop(id));
                }
            });
        }

        // Word guesses submit on Enter
        if let Some(el) = doc.get_element_by_id("guess-input") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() != "Enter" {
                    return;
                }
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                app.borrow_mut().act(PlayerAction::Guess(input.value()));
                input.set_value("");
            });
            let _ = el.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Typing input is checked on every keystroke
        if let Some(el) = doc.get_element_by_id("typing-input") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let mut a = app.borrow_mut();
                let before = a.arcade.session().score();
                a.act(PlayerAction::Type(input.value()));
                if a.arcade.session().score() > before {
                    input.set_value("");
                }
            });
            let _ = el.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_mute(app: Rc<RefCell<App>>) {
        let Some(doc) = document() else { return };
        let doc_clone = doc.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let hidden = doc_clone.visibility_state() == web_sys::VisibilityState::Hidden;
            let mut a = app.borrow_mut();
            if a.arcade.settings().mute_on_blur {
                a.audio.set_muted(hidden);
                log::info!("Audio {}", if hidden { "muted (tab hidden)" } else { "restored" });
            }
        });
        let _ = doc.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            a.update();
            render(&mut a);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_arcade::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Folio Arcade (native) starting...");
    log::info!("Native mode runs a scripted demo - use `trunk serve` for the web version");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a bot plays one round of every game against an in-memory
/// store and a simulated clock, then prints the leaderboard.
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use folio_arcade::Arcade;
    use folio_arcade::leaderboard::format_age;
    use folio_arcade::platform::{ManualClock, MemoryStore};
    use folio_arcade::sim::bubble_pop::BubblePop;
    use folio_arcade::sim::code_typing::CodeTyping;
    use folio_arcade::sim::color_pattern::{ColorPattern, TILE_COUNT};
    use folio_arcade::sim::whack_a_bug::{BugKind, WhackABug};
    use folio_arcade::sim::word_scramble::{WORDS, WordScramble};
    use folio_arcade::sim::{AnyGame, GameKind, PlayerAction, SessionState};

    /// Simulated milliseconds between bot decisions
    const STEP_MS: u64 = 250;
    /// Bot gives up on the memory game after this level
    const MEMORY_LEVELS: usize = 5;

    pub fn run() {
        let clock = ManualClock::new(1_700_000_000_000);
        let mut arcade = Arcade::open(MemoryStore::new(), &clock, 2024);
        println!("Playing as {}", arcade.player_name());

        for kind in GameKind::ALL {
            arcade.switch_game(kind);
            arcade.start();
            let mut step = 0u64;
            let result = loop {
                clock.advance(STEP_MS);
                step += 1;
                if let Some(result) = arcade.update() {
                    break result;
                }
                if let Some(action) = choose(arcade.session().game(), step) {
                    if let Some(result) = arcade.act(&action) {
                        break result;
                    }
                }
            };
            debug_assert_eq!(arcade.state(), SessionState::Ended);
            let marker = if result.new_best { "  new best!" } else { "" };
            println!("{:<22} {:>4}{}", kind.display_name(), result.score, marker);
            arcade.play_again();
        }

        arcade.rename_player("DemoBot");

        println!("\nLeaderboard:");
        let now = arcade.now_ms();
        for (i, entry) in arcade.leaderboard().entries().iter().enumerate() {
            println!(
                "{:>3}. {:<16} {:>4}  {:<22} {}",
                i + 1,
                entry.name,
                entry.score,
                entry.game,
                format_age(entry.timestamp, now)
            );
        }
    }

    fn choose(game: &AnyGame, step: u64) -> Option<PlayerAction> {
        match game {
            AnyGame::ColorPattern(g) => memory_move(g),
            AnyGame::WordScramble(g) => solve_scramble(g, step),
            AnyGame::BubblePop(g) => pop_smallest(g),
            AnyGame::WhackABug(g) => whack_safe(g),
            AnyGame::CodeTyping(g) => type_snippet(g, step),
        }
    }

    fn memory_move(game: &ColorPattern) -> Option<PlayerAction> {
        if !game.accepts_input() {
            return None;
        }
        let seq = game.sequence();
        if seq.len() > MEMORY_LEVELS {
            // Deliberately wrong
            return Some(PlayerAction::Tile((seq[game.entered()] + 1) % TILE_COUNT));
        }
        seq.get(game.entered()).copied().map(PlayerAction::Tile)
    }

    fn solve_scramble(game: &WordScramble, step: u64) -> Option<PlayerAction> {
        // Think for a second per word
        if step % 4 != 0 {
            return None;
        }
        let mut letters: Vec<char> = game.scrambled().chars().collect();
        letters.sort_unstable();
        WORDS.iter().find_map(|(word, _)| {
            let mut candidate: Vec<char> = word.chars().collect();
            candidate.sort_unstable();
            (candidate == letters).then(|| PlayerAction::Guess(word.to_string()))
        })
    }

    fn pop_smallest(game: &BubblePop) -> Option<PlayerAction> {
        game.bubbles()
            .iter()
            .max_by_key(|b| b.points)
            .map(|b| PlayerAction::Pop(b.id))
    }

    fn whack_safe(game: &WhackABug) -> Option<PlayerAction> {
        game.holes()
            .iter()
            .position(|h| matches!(h, Some(BugKind::Normal | BugKind::Golden)))
            .map(PlayerAction::Whack)
    }

    fn type_snippet(game: &CodeTyping, step: u64) -> Option<PlayerAction> {
        // One snippet every three seconds
        (step % 12 == 0).then(|| PlayerAction::Type(game.snippet().to_string()))
    }
}
