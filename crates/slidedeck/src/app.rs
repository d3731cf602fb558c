use eframe::egui;
use std::path::PathBuf;

use crate::config::Config;
use crate::controller::{Controller, DisplayState, Tag, Tagged};
use crate::deck::{self, Slide};
use crate::input::{self, Key, KeyOutcome, PointerControl, SwipeTracker};
use crate::theme::Theme;

const PROGRESS_HEIGHT: f32 = 6.0;
const NAV_BAR_HEIGHT: f32 = 64.0;
const NAV_BUTTON_WIDTH: f32 = 72.0;
const MAX_DOTS: usize = 40;

/// Keys the window itself answers to, outside the deck's navigation map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostAction {
    Quit,
    ToggleTheme,
}

struct DeckApp {
    controller: Controller<Slide, DisplayState>,
    swipe: SwipeTracker,
    theme: Theme,
}

fn translate_key(key: egui::Key) -> Key {
    match key {
        egui::Key::ArrowRight => Key::ArrowRight,
        egui::Key::ArrowLeft => Key::ArrowLeft,
        egui::Key::Space => Key::Space,
        egui::Key::Home => Key::Home,
        egui::Key::End => Key::End,
        _ => Key::Other,
    }
}

impl DeckApp {
    fn new(controller: Controller<Slide, DisplayState>, theme: Theme) -> Self {
        Self {
            controller,
            swipe: SwipeTracker::new(),
            theme,
        }
    }

    /// Feed one raw event to the deck. Returns the key press to consume when
    /// the deck handled it, so egui widgets don't also react to it.
    fn handle_event(
        &mut self,
        event: &egui::Event,
    ) -> (Option<(egui::Key, egui::Modifiers)>, Option<HostAction>) {
        match event {
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => match *key {
                egui::Key::Q if modifiers.is_none() => (None, Some(HostAction::Quit)),
                egui::Key::D if modifiers.is_none() => (None, Some(HostAction::ToggleTheme)),
                key => match input::key_command(translate_key(key)) {
                    KeyOutcome::Handled(command) => {
                        self.controller.apply(command);
                        (Some((key, *modifiers)), None)
                    }
                    KeyOutcome::Ignored => (None, None),
                },
            },
            egui::Event::Touch { phase, pos, .. } => {
                match phase {
                    egui::TouchPhase::Start => self.swipe.touch_start(pos.x),
                    egui::TouchPhase::End => {
                        if let Some(command) = self.swipe.touch_end(pos.x) {
                            self.controller.apply(command);
                        }
                    }
                    egui::TouchPhase::Move | egui::TouchPhase::Cancel => {}
                }
                (None, None)
            }
            _ => (None, None),
        }
    }

    fn press(&mut self, control: PointerControl) {
        self.controller.apply(control.command());
    }

    fn draw_slide(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let slide = self.controller.current_slide();
        let padding = 80.0 * scale;
        let content = rect.shrink(padding);
        let painter = ui.painter();
        let mut y = content.top();

        if let Some(title) = &slide.title {
            let galley = painter.layout(
                title.clone(),
                egui::FontId::proportional(self.theme.heading_size * scale),
                self.theme.heading_color,
                content.width(),
            );
            let height = galley.rect.height();
            painter.galley(egui::pos2(content.left(), y), galley, self.theme.heading_color);
            y += height + 32.0 * scale;
        }

        let galley = painter.layout(
            slide.body.clone(),
            egui::FontId::proportional(self.theme.body_size * scale),
            self.theme.foreground,
            content.width(),
        );
        painter.galley(egui::pos2(content.left(), y), galley, self.theme.foreground);
    }

    fn draw_progress(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let display = self.controller.surface();
        let track = egui::Rect::from_min_size(
            rect.left_top(),
            egui::vec2(rect.width(), PROGRESS_HEIGHT * scale),
        );
        ui.painter().rect_filled(track, 0.0, self.theme.track);
        let mut fill = track;
        fill.set_width(track.width() * display.progress / 100.0);
        ui.painter().rect_filled(fill, 0.0, self.theme.accent);
    }

    /// Back/forward buttons and the counter. Returns the control that was
    /// clicked this frame, if any.
    fn draw_nav_bar(
        &self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        scale: f32,
    ) -> Option<PointerControl> {
        let display = *self.controller.surface();
        let bar_h = NAV_BAR_HEIGHT * scale;
        let button_w = NAV_BUTTON_WIDTH * scale;
        let font = egui::FontId::proportional(self.theme.chrome_size * scale);
        let top = rect.bottom() - bar_h;

        let back_rect =
            egui::Rect::from_min_size(egui::pos2(rect.left(), top), egui::vec2(button_w, bar_h));
        let forward_rect = egui::Rect::from_min_size(
            egui::pos2(rect.right() - button_w, top),
            egui::vec2(button_w, bar_h),
        );

        let back = egui::Button::new(
            egui::RichText::new("\u{2039}")
                .font(font.clone())
                .color(self.theme.control_color(display.is_first)),
        )
        .frame(false);
        let forward = egui::Button::new(
            egui::RichText::new("\u{203A}")
                .font(font.clone())
                .color(self.theme.control_color(display.is_last)),
        )
        .frame(false);

        let mut clicked = None;
        if ui.put(back_rect, back).clicked() {
            clicked = Some(PointerControl::Backward);
        }
        if ui.put(forward_rect, forward).clicked() {
            clicked = Some(PointerControl::Forward);
        }

        let counter_color = Theme::with_opacity(self.theme.foreground, 0.6);
        let galley = ui.painter().layout_no_wrap(
            format!("{} / {}", display.current, display.total),
            font,
            counter_color,
        );
        let pos = egui::pos2(
            rect.center().x - galley.rect.width() / 2.0,
            top + (bar_h - galley.rect.height()) / 2.0,
        );
        ui.painter().galley(pos, galley, counter_color);

        clicked
    }

    /// One dot per slide above the nav bar, colored by its tags.
    fn draw_dots(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let slides = self.controller.slides();
        if slides.len() > MAX_DOTS {
            return;
        }
        let radius = 4.0 * scale;
        let gap = 14.0 * scale;
        let width = gap * (slides.len() as f32 - 1.0);
        let y = rect.bottom() - (NAV_BAR_HEIGHT + 8.0) * scale;
        let mut x = rect.center().x - width / 2.0;
        for slide in slides {
            let tags = slide.tags();
            let color = if tags.contains(Tag::Active) {
                self.theme.accent
            } else if tags.is_rest() {
                self.theme.track
            } else {
                Theme::with_opacity(self.theme.foreground, 0.4)
            };
            ui.painter().circle_filled(egui::pos2(x, y), radius, color);
            x += gap;
        }
    }

    fn compute_scale(rect: egui::Rect) -> f32 {
        (rect.width() / 1920.0).min(rect.height() / 1080.0)
    }
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let events = ctx.input(|i| i.events.clone());

        let mut handled_keys = Vec::new();
        let mut actions = Vec::new();
        for event in &events {
            let (key, action) = self.handle_event(event);
            handled_keys.extend(key);
            actions.extend(action);
        }

        // Recognized keys don't fall through to focused widgets
        if !handled_keys.is_empty() {
            ctx.input_mut(|i| {
                for &(key, modifiers) in &handled_keys {
                    i.consume_key(modifiers, key);
                }
            });
        }

        for action in actions {
            match action {
                HostAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                HostAction::ToggleTheme => self.theme = self.theme.toggled(),
            }
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let scale = Self::compute_scale(rect);

                self.draw_slide(ui, rect, scale);
                self.draw_progress(ui, rect, scale);
                self.draw_dots(ui, rect, scale);
                if let Some(control) = self.draw_nav_bar(ui, rect, scale) {
                    self.press(control);
                }
            });
    }
}

pub fn run(file: PathBuf, windowed: bool, start_slide: Option<usize>) -> anyhow::Result<()> {
    let slides = deck::load(&file)?;
    let config = Config::load_or_default();

    // CLI flags override config
    let start = start_slide
        .or(config.start_slide())
        .unwrap_or(1)
        .saturating_sub(1);
    let windowed = windowed || config.windowed();
    let theme = Theme::from_name(config.theme());

    let controller = Controller::starting_at(slides, DisplayState::default(), start)?;
    tracing::info!(
        file = %file.display(),
        slides = controller.total_slides(),
        start = controller.current_index() + 1,
        "presenting"
    );

    let title = format!(
        "slidedeck \u{2014} {}",
        file.file_name().unwrap_or_default().to_string_lossy()
    );

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(DeckApp::new(controller, theme)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(n: usize) -> DeckApp {
        let slides: Vec<Slide> = (0..n)
            .map(|i| Slide::new(format!("# Slide {}", i + 1)))
            .collect();
        let controller = Controller::new(slides, DisplayState::default()).unwrap();
        DeckApp::new(controller, Theme::dark())
    }

    fn key(key: egui::Key) -> egui::Event {
        key_with(key, egui::Modifiers::NONE)
    }

    fn key_with(key: egui::Key, modifiers: egui::Modifiers) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    fn touch(phase: egui::TouchPhase, x: f32) -> egui::Event {
        egui::Event::Touch {
            device_id: egui::TouchDeviceId(0),
            id: egui::TouchId(0),
            phase,
            pos: egui::pos2(x, 300.0),
            force: None,
        }
    }

    #[test]
    fn test_jump_keys() {
        let mut app = app(5);
        app.controller.go_to_slide(2);
        let (consumed, _) = app.handle_event(&key(egui::Key::End));
        assert_eq!(consumed, Some((egui::Key::End, egui::Modifiers::NONE)));
        assert_eq!(app.controller.current_index(), 4);
        app.handle_event(&key(egui::Key::Home));
        assert_eq!(app.controller.current_index(), 0);
    }

    #[test]
    fn test_space_advances_and_is_consumed() {
        let mut app = app(3);
        let (consumed, action) = app.handle_event(&key(egui::Key::Space));
        assert_eq!(consumed, Some((egui::Key::Space, egui::Modifiers::NONE)));
        assert_eq!(action, None);
        assert_eq!(app.controller.current_index(), 1);
    }

    #[test]
    fn test_unrelated_key_passes_through() {
        let mut app = app(3);
        let (consumed, action) = app.handle_event(&key(egui::Key::A));
        assert_eq!(consumed, None);
        assert_eq!(action, None);
        assert_eq!(app.controller.current_index(), 0);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = app(3);
        let release = egui::Event::Key {
            key: egui::Key::ArrowRight,
            physical_key: None,
            pressed: false,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        };
        app.handle_event(&release);
        assert_eq!(app.controller.current_index(), 0);
    }

    #[test]
    fn test_host_keys() {
        let mut app = app(2);
        assert_eq!(
            app.handle_event(&key(egui::Key::Q)).1,
            Some(HostAction::Quit)
        );
        assert_eq!(
            app.handle_event(&key(egui::Key::D)).1,
            Some(HostAction::ToggleTheme)
        );
        assert_eq!(app.controller.current_index(), 0);
    }

    #[test]
    fn test_modified_key_consumed_with_its_modifiers() {
        let mut app = app(5);
        let (consumed, _) = app.handle_event(&key_with(egui::Key::Space, egui::Modifiers::SHIFT));
        assert_eq!(consumed, Some((egui::Key::Space, egui::Modifiers::SHIFT)));
        assert_eq!(app.controller.current_index(), 1);

        let (consumed, _) = app.handle_event(&key_with(egui::Key::End, egui::Modifiers::CTRL));
        assert_eq!(consumed, Some((egui::Key::End, egui::Modifiers::CTRL)));
        assert_eq!(app.controller.current_index(), 4);
    }

    #[test]
    fn test_host_keys_ignore_modified_presses() {
        let mut app = app(2);
        assert_eq!(
            app.handle_event(&key_with(egui::Key::D, egui::Modifiers::CTRL)),
            (None, None)
        );
        assert_eq!(
            app.handle_event(&key_with(egui::Key::Q, egui::Modifiers::COMMAND)),
            (None, None)
        );
        assert_eq!(app.controller.current_index(), 0);
    }

    #[test]
    fn test_swipe_filtering() {
        let mut app = app(5);
        app.handle_event(&touch(egui::TouchPhase::Start, 400.0));
        app.handle_event(&touch(egui::TouchPhase::End, 360.0));
        assert_eq!(app.controller.current_index(), 0);

        app.handle_event(&touch(egui::TouchPhase::Start, 400.0));
        app.handle_event(&touch(egui::TouchPhase::Move, 370.0));
        app.handle_event(&touch(egui::TouchPhase::End, 340.0));
        assert_eq!(app.controller.current_index(), 1);

        app.handle_event(&touch(egui::TouchPhase::Start, 100.0));
        app.handle_event(&touch(egui::TouchPhase::End, 200.0));
        assert_eq!(app.controller.current_index(), 0);
    }

    #[test]
    fn test_buttons_fire_at_boundaries() {
        let mut app = app(2);
        app.press(PointerControl::Backward);
        assert_eq!(app.controller.current_index(), 0);
        app.press(PointerControl::Forward);
        app.press(PointerControl::Forward);
        assert_eq!(app.controller.current_index(), 1);
        assert!(app.controller.surface().is_last);
    }
}
