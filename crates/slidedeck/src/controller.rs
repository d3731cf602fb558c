use tracing::debug;

use crate::error::DeckError;
use crate::input::NavCommand;

/// Visibility marker carried by a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Currently the visible slide
    Active,
    /// Left the stage moving forward
    Prev,
    /// Left the stage moving backward
    Next,
}

/// The three independent tags a slide can carry. All false is the rest state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlideTags {
    pub active: bool,
    pub prev: bool,
    pub next: bool,
}

impl SlideTags {
    pub fn add(&mut self, tag: Tag) {
        *self.slot(tag) = true;
    }

    pub fn remove(&mut self, tag: Tag) {
        *self.slot(tag) = false;
    }

    pub fn contains(&self, tag: Tag) -> bool {
        match tag {
            Tag::Active => self.active,
            Tag::Prev => self.prev,
            Tag::Next => self.next,
        }
    }

    pub fn is_rest(&self) -> bool {
        !self.active && !self.prev && !self.next
    }

    fn slot(&mut self, tag: Tag) -> &mut bool {
        match tag {
            Tag::Active => &mut self.active,
            Tag::Prev => &mut self.prev,
            Tag::Next => &mut self.next,
        }
    }
}

/// A slide element the controller can tag. The content itself stays opaque.
pub trait Tagged {
    fn tags(&self) -> &SlideTags;
    fn tags_mut(&mut self) -> &mut SlideTags;
}

/// Display elements kept in sync with the current position: a progress fill,
/// a `current / total` counter and the first/last boundary flags.
pub trait DisplaySurface {
    /// Fill proportion in percent (0-100].
    fn set_progress(&mut self, percent: f32);
    /// `current` is 1-based.
    fn set_counter(&mut self, current: usize, total: usize);
    fn set_boundaries(&mut self, first: bool, last: bool);
}

/// Snapshot of everything derived from the current index.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplayState {
    pub progress: f32,
    pub current: usize,
    pub total: usize,
    pub is_first: bool,
    pub is_last: bool,
}

impl DisplayState {
    pub fn at(index: usize, total: usize) -> Self {
        Self {
            progress: (index + 1) as f32 * 100.0 / total as f32,
            current: index + 1,
            total,
            is_first: index == 0,
            is_last: index + 1 == total,
        }
    }

    fn publish(&self, surface: &mut impl DisplaySurface) {
        surface.set_progress(self.progress);
        surface.set_counter(self.current, self.total);
        surface.set_boundaries(self.is_first, self.is_last);
    }
}

// A bare snapshot is a valid surface, which makes it usable headless.
impl DisplaySurface for DisplayState {
    fn set_progress(&mut self, percent: f32) {
        self.progress = percent;
    }

    fn set_counter(&mut self, current: usize, total: usize) {
        self.current = current;
        self.total = total;
    }

    fn set_boundaries(&mut self, first: bool, last: bool) {
        self.is_first = first;
        self.is_last = last;
    }
}

/// Owns the slide sequence, the current index and the display surface.
///
/// Every input channel ends up in [`Controller::go_to_slide`]; out-of-range
/// targets are dropped without mutating anything.
#[derive(Debug)]
pub struct Controller<S, D> {
    slides: Vec<S>,
    surface: D,
    current: usize,
}

impl<S: Tagged, D: DisplaySurface> Controller<S, D> {
    pub fn new(slides: Vec<S>, surface: D) -> Result<Self, DeckError> {
        Self::starting_at(slides, surface, 0)
    }

    /// Place the deck at `start` (clamped to the last slide). This is not a
    /// transition: no directional tags are assigned.
    pub fn starting_at(mut slides: Vec<S>, surface: D, start: usize) -> Result<Self, DeckError> {
        if slides.is_empty() {
            return Err(DeckError::Empty);
        }
        let current = start.min(slides.len() - 1);
        for (i, slide) in slides.iter_mut().enumerate() {
            let tags = slide.tags_mut();
            if i == current {
                tags.remove(Tag::Prev);
                tags.remove(Tag::Next);
                tags.add(Tag::Active);
            } else {
                tags.remove(Tag::Active);
            }
        }

        let mut controller = Self {
            slides,
            surface,
            current,
        };
        controller.refresh();
        debug!(
            start = current + 1,
            total = controller.total_slides(),
            "deck ready"
        );
        Ok(controller)
    }

    pub fn go_to_slide(&mut self, target: isize) {
        let Some(index) = usize::try_from(target)
            .ok()
            .filter(|&i| i < self.slides.len())
        else {
            return;
        };

        let leaving = self.current;
        let going_forward = index > leaving;

        // Entering slide sheds its exit direction before it turns active.
        let entering = self.slides[index].tags_mut();
        entering.remove(Tag::Prev);
        entering.remove(Tag::Next);

        let leaving_tags = self.slides[leaving].tags_mut();
        leaving_tags.remove(Tag::Active);
        leaving_tags.add(if going_forward { Tag::Prev } else { Tag::Next });

        self.current = index;
        self.slides[index].tags_mut().add(Tag::Active);

        debug!(
            from = leaving + 1,
            to = index + 1,
            total = self.slides.len(),
            "slide transition"
        );
        self.refresh();
    }

    pub fn next_slide(&mut self) {
        self.go_to_slide(self.current as isize + 1);
    }

    pub fn prev_slide(&mut self) {
        self.go_to_slide(self.current as isize - 1);
    }

    pub fn first_slide(&mut self) {
        self.go_to_slide(0);
    }

    pub fn last_slide(&mut self) {
        self.go_to_slide(self.slides.len() as isize - 1);
    }

    pub fn apply(&mut self, command: NavCommand) {
        match command {
            NavCommand::Next => self.next_slide(),
            NavCommand::Prev => self.prev_slide(),
            NavCommand::First => self.first_slide(),
            NavCommand::Last => self.last_slide(),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn total_slides(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[S] {
        &self.slides
    }

    pub fn current_slide(&self) -> &S {
        &self.slides[self.current]
    }

    pub fn display(&self) -> DisplayState {
        DisplayState::at(self.current, self.slides.len())
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    fn refresh(&mut self) {
        self.display().publish(&mut self.surface);
    }
}
