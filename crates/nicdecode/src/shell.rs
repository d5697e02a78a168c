//! The two-screen verification shell.
//!
//! [`App`] holds which screen is showing and the verification [`Form`]. It
//! performs no I/O and never sleeps: every step that the front-end paces with
//! a delay is split into a *begin* call that hands back a token and a
//! *complete* call that consumes it. The caller decides how long to wait in
//! between, usually via [`Pacing`].

use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::nic::{self, NicError, NicRecord, MAX_NIC_LEN};

/// Placeholder shown on a result card with no value.
pub const EMPTY_VALUE: &str = "-";

/// Icon shown on the gender card before any NIC has been decoded.
pub const UNKNOWN_GENDER_ICON: &str = "👤";

/// Input line that leaves the verification screen, like the close button.
pub const BACK_COMMAND: &str = ":back";

/// Input line that exits the shell from either screen.
pub const QUIT_COMMAND: &str = ":quit";

/// Which screen is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Title and a single call-to-action.
    #[default]
    Landing,
    /// NIC input form and result cards.
    Verification,
}

/// A screen switch that has begun but not yet completed.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a transition does nothing until passed to App::complete_transition"]
pub struct Transition {
    target: Screen,
}

impl Transition {
    /// The screen this transition leads to.
    #[must_use]
    pub fn target(&self) -> Screen {
        self.target
    }
}

/// A submitted NIC waiting to be decoded.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a submission does nothing until passed to Form::complete"]
pub struct Submission {
    input: String,
}

impl Submission {
    /// The input text as it was when submitted.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// What the caller must do after [`App::handle_line`].
#[derive(Debug, PartialEq, Eq)]
pub enum LineAction {
    /// Leave the shell.
    Quit,
    /// Wait out the transition delay, then [`App::complete_transition`].
    Switch(Transition),
    /// Wait out the reveal delay, then [`App::complete_submission`].
    Submit(Submission),
    /// Nothing pending; redraw the current screen.
    Redraw,
}

/// One of the three cards in the result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    /// Card heading.
    pub label: &'static str,
    /// Card value, or [`EMPTY_VALUE`].
    pub value: String,
    /// Card icon.
    pub icon: &'static str,
}

/// State of the verification form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    input: String,
    error: Option<NicError>,
    record: Option<NicRecord>,
    loading: bool,
    show_results: bool,
}

impl Form {
    /// Replace the input text, keeping at most [`MAX_NIC_LEN`] characters.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.chars().take(MAX_NIC_LEN).collect();
    }

    /// Current input text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Error from the last submission, if any.
    #[must_use]
    pub fn error(&self) -> Option<NicError> {
        self.error
    }

    /// Record from the last successful submission, if any.
    #[must_use]
    pub fn record(&self) -> Option<&NicRecord> {
        self.record.as_ref()
    }

    /// Whether a submission is waiting to be completed.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the result panel is revealed.
    #[must_use]
    pub fn shows_results(&self) -> bool {
        self.show_results
    }

    /// Submit the current input.
    ///
    /// Clears the previous error and hides the result panel. Blank input
    /// fails straight away with [`NicError::EmptyInput`] and returns `None`,
    /// as does submitting while an earlier submission is still loading.
    /// Otherwise the form enters the loading state and the returned
    /// [`Submission`] must be passed to [`Form::complete`].
    pub fn submit(&mut self) -> Option<Submission> {
        if self.loading {
            debug!("ignoring submit while loading");
            return None;
        }

        self.error = None;
        self.show_results = false;

        if self.input.trim().is_empty() {
            self.fail(NicError::EmptyInput);
            return None;
        }

        self.loading = true;
        Some(Submission {
            input: self.input.clone(),
        })
    }

    /// Decode a pending submission and update the form with the outcome.
    ///
    /// # Errors
    ///
    /// Returns the [`NicError`] shown to the user when the submitted text is
    /// not a valid NIC. The previous record is cleared in that case.
    pub fn complete(&mut self, submission: Submission) -> Result<&NicRecord, NicError> {
        self.loading = false;

        match nic::parse(&submission.input) {
            Ok(record) => {
                self.show_results = true;
                Ok(&*self.record.insert(record))
            }
            Err(err) => {
                self.fail(err);
                Err(err)
            }
        }
    }

    fn fail(&mut self, err: NicError) {
        info!(error = %err, "NIC rejected");
        self.error = Some(err);
        self.record = None;
    }

    /// The NIC, date of birth and gender cards.
    ///
    /// The NIC card echoes the input as typed. Missing values show
    /// [`EMPTY_VALUE`].
    #[must_use]
    pub fn result_cards(&self) -> [ResultCard; 3] {
        let or_empty = |value: Option<String>| {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| EMPTY_VALUE.to_string())
        };
        let gender = self.record.as_ref().map(|r| r.gender);

        [
            ResultCard {
                label: "NIC Number",
                value: or_empty(Some(self.input.clone())),
                icon: "🔢",
            },
            ResultCard {
                label: "Date of Birth",
                value: or_empty(self.record.as_ref().map(NicRecord::date_of_birth_display)),
                icon: "🎂",
            },
            ResultCard {
                label: "Gender",
                value: or_empty(gender.map(|g| g.as_str().to_string())),
                icon: gender.map_or(UNKNOWN_GENDER_ICON, |g| g.icon()),
            },
        ]
    }
}

/// The landing/verification screen toggle plus the form.
#[derive(Debug, Default)]
pub struct App {
    screen: Screen,
    pending: Option<Screen>,
    form: Form,
}

impl App {
    /// Create an app on the landing screen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The visible screen.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Whether a screen switch has begun but not completed.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    /// Begin switching to the verification screen (the call-to-action).
    ///
    /// Returns `None` if that screen is already showing or another switch
    /// is in progress.
    pub fn show_verification(&mut self) -> Option<Transition> {
        self.begin_transition(Screen::Verification)
    }

    /// Begin switching back to the landing screen (the close button).
    ///
    /// Returns `None` if that screen is already showing or another switch
    /// is in progress.
    pub fn show_landing(&mut self) -> Option<Transition> {
        self.begin_transition(Screen::Landing)
    }

    fn begin_transition(&mut self, target: Screen) -> Option<Transition> {
        if self.pending.is_some() || self.screen == target {
            return None;
        }
        debug!(from = ?self.screen, to = ?target, "screen transition started");
        self.pending = Some(target);
        Some(Transition { target })
    }

    /// Finish a screen switch. The form starts fresh on every switch.
    pub fn complete_transition(&mut self, transition: Transition) {
        self.pending = None;
        if self.screen != transition.target {
            self.screen = transition.target;
            self.form = Form::default();
            debug!(screen = ?self.screen, "screen transition finished");
        }
    }

    /// Apply one line of terminal input.
    ///
    /// [`QUIT_COMMAND`] quits from either screen. On the landing screen any
    /// other line is the call-to-action. On the verification screen
    /// [`BACK_COMMAND`] closes the form and anything else is typed into the
    /// input and submitted.
    pub fn handle_line(&mut self, line: &str) -> LineAction {
        let command = line.trim();
        if command == QUIT_COMMAND {
            return LineAction::Quit;
        }

        let pending = match self.screen {
            Screen::Landing => self.show_verification().map(LineAction::Switch),
            Screen::Verification if command == BACK_COMMAND => {
                self.show_landing().map(LineAction::Switch)
            }
            Screen::Verification => {
                self.form.set_input(line);
                self.form.submit().map(LineAction::Submit)
            }
        };
        pending.unwrap_or(LineAction::Redraw)
    }

    /// Decode a submission made through [`App::handle_line`].
    pub fn complete_submission(&mut self, submission: Submission) {
        if let Err(err) = self.form.complete(submission) {
            debug!(error = %err, "submission rejected");
        }
    }

    /// The verification form.
    #[must_use]
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// The verification form, if the verification screen is showing.
    pub fn form_mut(&mut self) -> Option<&mut Form> {
        match self.screen {
            Screen::Verification => Some(&mut self.form),
            Screen::Landing => None,
        }
    }
}

/// Cosmetic delays between the begin and complete steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pacing {
    /// Wait between [`Form::submit`] and [`Form::complete`].
    pub reveal: Duration,
    /// Wait between starting and completing a screen switch.
    pub transition: Duration,
}

impl Pacing {
    /// Pacing with both delays taken from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            reveal: config.reveal_delay(),
            transition: config.transition_delay(),
        }
    }

    /// Wait out the reveal delay.
    pub async fn before_reveal(&self) {
        pause(self.reveal).await;
    }

    /// Wait out the screen transition delay.
    pub async fn before_transition(&self) {
        pause(self.transition).await;
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nic::Gender;

    fn verification_app() -> App {
        let mut app = App::new();
        let transition = app.show_verification().unwrap();
        app.complete_transition(transition);
        app
    }

    fn submit(form: &mut Form, text: &str) -> Result<NicRecord, NicError> {
        form.set_input(text);
        match form.submit() {
            Some(submission) => form.complete(submission).cloned(),
            None => Err(form.error().unwrap()),
        }
    }

    #[test]
    fn test_app_starts_on_landing() {
        let app = App::new();
        assert_eq!(app.screen(), Screen::Landing);
        assert!(!app.is_transitioning());
    }

    #[test]
    fn test_show_verification() {
        let mut app = App::new();
        let transition = app.show_verification().unwrap();

        assert_eq!(transition.target(), Screen::Verification);
        assert!(app.is_transitioning());
        assert_eq!(app.screen(), Screen::Landing);

        app.complete_transition(transition);
        assert_eq!(app.screen(), Screen::Verification);
        assert!(!app.is_transitioning());
    }

    #[test]
    fn test_no_transition_to_current_screen() {
        let mut app = App::new();
        assert!(app.show_landing().is_none());

        let mut app = verification_app();
        assert!(app.show_verification().is_none());
    }

    #[test]
    fn test_no_overlapping_transitions() {
        let mut app = App::new();
        let _first = app.show_verification().unwrap();
        assert!(app.show_verification().is_none());
        assert!(app.show_landing().is_none());
    }

    #[test]
    fn test_form_only_mutable_on_verification() {
        let mut app = App::new();
        assert!(app.form_mut().is_none());

        let mut app = verification_app();
        assert!(app.form_mut().is_some());
    }

    #[test]
    fn test_switching_screens_resets_form() {
        let mut app = verification_app();
        let form = app.form_mut().unwrap();
        submit(form, "881002105V").unwrap();
        assert!(app.form().record().is_some());

        let back = app.show_landing().unwrap();
        app.complete_transition(back);
        let again = app.show_verification().unwrap();
        app.complete_transition(again);

        assert_eq!(app.form(), &Form::default());
    }

    #[test]
    fn test_input_truncated_to_twelve_chars() {
        let mut form = Form::default();
        form.set_input("1234567890123456");
        assert_eq!(form.input(), "123456789012");

        form.set_input("881002105V");
        assert_eq!(form.input(), "881002105V");
    }

    #[test]
    fn test_submit_empty_input() {
        let mut form = Form::default();
        form.set_input("   ");

        assert!(form.submit().is_none());
        assert_eq!(form.error(), Some(NicError::EmptyInput));
        assert!(!form.is_loading());
        assert!(!form.shows_results());
    }

    #[test]
    fn test_submit_and_complete_valid() {
        let mut form = Form::default();
        form.set_input("881002105v");

        let submission = form.submit().unwrap();
        assert_eq!(submission.input(), "881002105v");
        assert!(form.is_loading());
        assert!(!form.shows_results());

        let record = form.complete(submission).unwrap();
        assert_eq!(record.gender, Gender::Male);
        assert!(!form.is_loading());
        assert!(form.shows_results());
        assert!(form.error().is_none());
    }

    #[test]
    fn test_submit_while_loading_is_ignored() {
        let mut form = Form::default();
        form.set_input("881002105V");
        let _pending = form.submit().unwrap();

        assert!(form.submit().is_none());
        assert!(form.error().is_none());
    }

    #[test]
    fn test_invalid_format_clears_previous_record() {
        let mut form = Form::default();
        submit(&mut form, "881002105V").unwrap();
        assert!(form.record().is_some());

        assert_eq!(submit(&mut form, "123456789Z"), Err(NicError::InvalidFormat));
        assert!(form.record().is_none());
        assert!(!form.shows_results());
        assert_eq!(form.error(), Some(NicError::InvalidFormat));
    }

    #[test]
    fn test_empty_input_clears_previous_record() {
        let mut form = Form::default();
        submit(&mut form, "881002105V").unwrap();

        assert_eq!(submit(&mut form, ""), Err(NicError::EmptyInput));
        assert!(form.record().is_none());
    }

    #[test]
    fn test_new_submission_clears_error() {
        let mut form = Form::default();
        submit(&mut form, "12345").unwrap_err();

        submit(&mut form, "198810210597").unwrap();
        assert!(form.error().is_none());
    }

    #[test]
    fn test_resubmission_is_idempotent() {
        let mut form = Form::default();
        let first = submit(&mut form, "886002105V").unwrap();
        let second = submit(&mut form, "886002105V").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_cards_empty() {
        let cards = Form::default().result_cards();

        assert_eq!(cards[0].label, "NIC Number");
        assert!(cards.iter().all(|c| c.value == EMPTY_VALUE));
        assert_eq!(cards[2].icon, UNKNOWN_GENDER_ICON);
    }

    #[test]
    fn test_result_cards_female() {
        let mut form = Form::default();
        submit(&mut form, " 886002105v").unwrap();
        let cards = form.result_cards();

        assert_eq!(cards[0].value, " 886002105v");
        assert_eq!(cards[1].value, "09/04/1988");
        assert_eq!(cards[2].value, "Female");
        assert_eq!(cards[2].icon, "👩");
    }

    #[test]
    fn test_line_on_landing_opens_verification() {
        let mut app = App::new();

        let LineAction::Switch(transition) = app.handle_line("") else {
            panic!("expected a screen switch");
        };
        assert_eq!(transition.target(), Screen::Verification);
        app.complete_transition(transition);
        assert_eq!(app.screen(), Screen::Verification);
    }

    #[test]
    fn test_quit_from_either_screen() {
        assert_eq!(App::new().handle_line(":quit"), LineAction::Quit);
        assert_eq!(verification_app().handle_line("  :quit "), LineAction::Quit);
    }

    #[test]
    fn test_back_returns_to_landing() {
        let mut app = verification_app();

        let LineAction::Switch(transition) = app.handle_line(":back") else {
            panic!("expected a screen switch");
        };
        assert_eq!(transition.target(), Screen::Landing);
        app.complete_transition(transition);
        assert_eq!(app.screen(), Screen::Landing);
    }

    #[test]
    fn test_line_during_transition_redraws() {
        let mut app = App::new();
        let _pending = app.show_verification().unwrap();

        assert_eq!(app.handle_line(""), LineAction::Redraw);
    }

    #[test]
    fn test_line_on_verification_submits() {
        let mut app = verification_app();

        let LineAction::Submit(submission) = app.handle_line("886002105v") else {
            panic!("expected a submission");
        };
        assert!(app.form().is_loading());

        app.complete_submission(submission);
        assert_eq!(app.form().record().map(|r| r.gender), Some(Gender::Female));
        assert!(app.form().shows_results());
    }

    #[test]
    fn test_blank_line_on_verification_redraws_with_error() {
        let mut app = verification_app();

        assert_eq!(app.handle_line("   "), LineAction::Redraw);
        assert_eq!(app.form().error(), Some(NicError::EmptyInput));
    }

    #[test]
    fn test_rejected_submission_sets_error() {
        let mut app = verification_app();
        let LineAction::Submit(submission) = app.handle_line("123456789Z") else {
            panic!("expected a submission");
        };

        app.complete_submission(submission);
        assert_eq!(app.form().error(), Some(NicError::InvalidFormat));
        assert!(app.form().record().is_none());
    }

    #[test]
    fn test_pacing_from_config() {
        let pacing = Pacing::from_config(&Config::default());
        assert_eq!(pacing.reveal, Duration::from_millis(1000));
        assert_eq!(pacing.transition, Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_waits() {
        let pacing = Pacing::from_config(&Config::default());

        let start = tokio::time::Instant::now();
        pacing.before_reveal().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));

        let start = tokio::time::Instant::now();
        pacing.before_transition().await;
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_pacing_does_not_wait() {
        let start = tokio::time::Instant::now();
        Pacing::default().before_reveal().await;
        Pacing::default().before_transition().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
