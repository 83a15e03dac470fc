//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! App coordinates between components; the table logic lives in
//! [`TableView`].

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_home_screen, AuthorDialog, DeleteDialog, HelpDialog, HomeComponent, HomeRenderContext,
    QuitDialog,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::TableView;
use crate::services::{DataSource, JsonFileSource, Loader};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::sync::Arc;
use std::time::Instant;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Author collection, page view and filter input
    pub table: TableView,

    /// Where the collection is fetched from
    source: Arc<dyn DataSource>,

    /// Background fetch of the collection
    pub loader: Loader,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub home: HomeComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub author_dialog: AuthorDialog,
    pub delete_dialog: DeleteDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create an App reading from the configured JSON file
    pub fn new(config: &Config) -> App {
        let source = Arc::new(JsonFileSource::new(&config.data_source));
        Self::with_source(source, config)
    }

    pub fn with_source(source: Arc<dyn DataSource>, config: &Config) -> App {
        App {
            table: TableView::new(
                config.page_size(),
                config.page_sizes(),
                config.filter_debounce(),
            ),
            source,
            loader: Loader::new(),
            modals: ModalStack::new(),
            should_quit: false,
            home: HomeComponent::new(),
            quit_dialog: QuitDialog,
            help_dialog: HelpDialog::default(),
            author_dialog: AuthorDialog::default(),
            delete_dialog: DeleteDialog::default(),
        }
    }

    fn row_count(&self) -> usize {
        self.table.view().rows().len()
    }

    /// Apply the top modal's confirmation
    fn confirm_modal(&mut self) -> Option<Action> {
        match self.modals.top().cloned() {
            Some(Modal::AddAuthor) | Some(Modal::EditAuthor { .. }) => {
                let form = self.author_dialog.form.as_mut()?;
                if form.confirm(self.table.store_mut()).is_open() {
                    // Validation failed, keep the dialog up
                    return None;
                }
                let result = form.state.result_code();
                self.author_dialog.close();

                match self.modals.pop() {
                    Some(Modal::AddAuthor) => {
                        self.table.on_add_closed(result);
                    }
                    Some(Modal::EditAuthor { id }) => {
                        self.table.on_edit_closed(id, result);
                    }
                    _ => {}
                }
            }
            Some(Modal::DeleteAuthor { id }) => {
                let confirm = self.delete_dialog.confirm.as_mut()?;
                let result = confirm.confirm(self.table.store_mut()).result_code();
                self.delete_dialog.close();
                self.modals.pop();
                self.table.on_delete_closed(id, result);
            }
            Some(Modal::QuitConfirm) => return Some(Action::ForceQuit),
            Some(Modal::Help) | None => {
                self.modals.pop();
            }
        }
        None
    }

    /// Close the top modal without a result
    fn close_modal(&mut self) {
        match self.modals.pop() {
            Some(Modal::AddAuthor) => {
                if let Some(mut form) = self.author_dialog.close() {
                    form.cancel();
                    self.table.on_add_closed(form.state.result_code());
                }
            }
            Some(Modal::EditAuthor { id }) => {
                if let Some(mut form) = self.author_dialog.close() {
                    form.cancel();
                    self.table.on_edit_closed(id, form.state.result_code());
                }
            }
            Some(Modal::DeleteAuthor { id }) => {
                if let Some(mut confirm) = self.delete_dialog.close() {
                    confirm.cancel();
                    self.table.on_delete_closed(id, confirm.state.result_code());
                }
            }
            Some(Modal::Help) => self.help_dialog.scroll_offset = 0,
            Some(Modal::QuitConfirm) | None => {}
        }
    }

    fn set_filter_text(&mut self) {
        self.table.filter_input(&self.home.filter_text, Instant::now());
    }

    fn reload(&mut self) {
        self.loader.spawn(Arc::clone(&self.source));
    }
}

impl Component for App {
    fn init(&mut self) -> Result<()> {
        // First load is synchronous; reloads go through the background loader
        self.table.init(&*self.source);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            self.handle_modal_key_event(&modal, key)
        } else {
            self.home.handle_key_event(key)
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let mut follow_up = None;

        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                if let Some(result) = self.loader.poll() {
                    self.table.apply_fetch(result);
                }
                self.table.tick(Instant::now());
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}
            Action::Reload => self.reload(),

            // ─────────────────────────────────────────────────────────────────
            // Rows & pages
            // ─────────────────────────────────────────────────────────────────
            Action::NextRow => {
                let rows = self.row_count();
                self.home.select_next(rows);
            }
            Action::PrevRow => {
                let rows = self.row_count();
                self.home.select_previous(rows);
            }
            Action::NextPage => {
                if self.table.next_page() {
                    self.home.selected = Some(0);
                }
            }
            Action::PrevPage => {
                if self.table.previous_page() {
                    self.home.selected = Some(0);
                }
            }
            Action::FirstPage => self.table.first_page(),
            Action::LastPage => self.table.last_page(),
            Action::CyclePageSize(forward) => self.table.cycle_page_size(forward),

            // ─────────────────────────────────────────────────────────────────
            // Sort
            // ─────────────────────────────────────────────────────────────────
            Action::CycleSortKey => self.table.cycle_sort_key(),
            Action::CycleSortDirection => self.table.cycle_sort_direction(),

            // ─────────────────────────────────────────────────────────────────
            // Filter
            // ─────────────────────────────────────────────────────────────────
            Action::EnterFilterMode => self.home.enter_filter_mode(),
            Action::ExitFilterMode => self.home.exit_filter_mode(),
            Action::FilterInput(c) => {
                self.home.filter_input(c);
                self.set_filter_text();
            }
            Action::FilterBackspace => {
                self.home.filter_backspace();
                self.set_filter_text();
            }
            Action::ClearFilter => {
                self.home.clear_filter();
                self.set_filter_text();
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::OpenAddDialog => {
                self.author_dialog.open_add();
                self.modals.push(Modal::AddAuthor);
            }
            Action::OpenEditDialog => {
                if let Some(record) = self.home.selected_record(self.table.view().rows()).cloned() {
                    self.author_dialog.open_edit(&record);
                    self.modals.push(Modal::EditAuthor { id: record.id });
                }
            }
            Action::OpenDeleteDialog => {
                if let Some(record) = self.home.selected_record(self.table.view().rows()).cloned() {
                    let id = record.id;
                    self.delete_dialog.open(record);
                    self.modals.push(Modal::DeleteAuthor { id });
                }
            }
            Action::ConfirmModal => follow_up = self.confirm_modal(),
            Action::CloseModal => self.close_modal(),
        }

        let rows = self.row_count();
        self.home.clamp_selection(rows);
        Ok(follow_up)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let source = self.source.describe();
        let ctx = HomeRenderContext {
            source: &source,
            loading: self.loader.is_running(),
        };

        draw_home_screen(frame, area, &self.home, &self.table, &ctx)?;

        // Modals draw bottom to top
        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::AddAuthor | Modal::EditAuthor { .. } => self.author_dialog.handle_key_event(key),
            Modal::DeleteAuthor { .. } => self.delete_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::AddAuthor | Modal::EditAuthor { .. } => self.author_dialog.draw(frame, area)?,
            Modal::DeleteAuthor { .. } => self.delete_dialog.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ui::InputMode;
    use crate::model::Record;
    use crate::services::FetchError;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    struct StaticSource(Vec<Record>);

    impl DataSource for StaticSource {
        fn fetch(&self) -> Result<Vec<Record>, FetchError> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    fn loaded_app() -> App {
        let source = Arc::new(StaticSource(vec![
            Record::new(1, "Ann", "Signed", "2018-01-01"),
            Record::new(2, "Bob", "Pending", ""),
            Record::new(3, "Cy", "Signed", "2019-03-04"),
        ]));
        let mut app = App::with_source(source, &Config::default());
        app.init().unwrap();
        app.update(Action::Tick).unwrap();
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        let mut action = app.handle_key_event(key).unwrap();
        while let Some(a) = action {
            action = app.update(a).unwrap();
        }
    }

    fn type_str(app: &mut App, text: &str) {
        text.chars().for_each(|c| press(app, KeyCode::Char(c)));
    }

    fn authors(app: &App) -> Vec<String> {
        app.table
            .store()
            .data()
            .iter()
            .map(|r| r.author.clone())
            .collect()
    }

    #[test]
    fn test_add_author_appends_record() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.modals.top(), Some(&Modal::AddAuthor));

        type_str(&mut app, "4");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Dee");
        press(&mut app, KeyCode::Enter);

        assert!(app.modals.top().is_none());
        assert_eq!(authors(&app), vec!["Ann", "Bob", "Cy", "Dee"]);
        assert_eq!(app.table.view().filtered_len(), 4);
    }

    #[test]
    fn test_add_author_with_missing_name_stays_open() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "4");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.modals.top(), Some(&Modal::AddAuthor));
        assert_eq!(app.table.store().len(), 3);

        press(&mut app, KeyCode::Esc);
        assert!(app.modals.top().is_none());
        assert_eq!(app.table.store().len(), 3);
    }

    #[test]
    fn test_edit_replaces_selected_record() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.modals.top(), Some(&Modal::EditAuthor { id: 2 }));

        type_str(&mut app, "by");
        press(&mut app, KeyCode::Enter);

        assert!(app.modals.top().is_none());
        assert_eq!(authors(&app), vec!["Ann", "Bobby", "Cy"]);
        assert_eq!(app.table.store().data()[1].id, 2);
    }

    #[test]
    fn test_delete_confirm_and_cancel() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.modals.top(), Some(&Modal::DeleteAuthor { id: 1 }));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.table.store().len(), 3);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.modals.top().is_none());
        assert_eq!(authors(&app), vec!["Bob", "Cy"]);
    }

    #[test]
    fn test_filter_applies_after_debounce() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.home.input_mode, InputMode::Filter);
        type_str(&mut app, "pend");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.home.input_mode, InputMode::Normal);

        assert!(app.table.tick(Instant::now() + Duration::from_millis(500)));
        assert_eq!(app.table.view().filtered_len(), 1);
        assert_eq!(app.table.view().rows()[0].author, "Bob");
    }

    #[test]
    fn test_quit_paths() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.should_quit);

        let mut app = loaded_app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key_event(ctrl_c).unwrap(), Some(Action::ForceQuit));
    }

    #[test]
    fn test_reload_fills_table_in_background() {
        let source = Arc::new(StaticSource(vec![Record::new(9, "Zed", "", "")]));
        let mut app = App::with_source(source, &Config::default());
        assert!(app.table.store().is_empty());
        app.update(Action::Reload).unwrap();

        for _ in 0..100 {
            app.update(Action::Tick).unwrap();
            if !app.loader.is_running() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }

        assert_eq!(authors(&app), vec!["Zed"]);
        assert!(app.table.loaded_at.is_some());
        assert_eq!(app.home.selected, Some(0));
    }

    #[test]
    fn test_zero_page_size_config_never_pages_by_zero() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        let mut app = App::with_source(Arc::new(StaticSource(Vec::new())), &config);
        assert_eq!(app.table.view().paginator().page_size, 10);

        for _ in 0..4 {
            app.update(Action::CyclePageSize(true)).unwrap();
            assert!(app.table.view().paginator().page_size >= 5);
        }
    }

    #[test]
    fn test_init_loads_before_first_tick() {
        let source = Arc::new(StaticSource(vec![Record::new(9, "Zed", "", "")]));
        let mut app = App::with_source(source, &Config::default());
        app.init().unwrap();

        assert!(!app.loader.is_running());
        assert_eq!(app.table.view().rows().len(), 1);
        assert!(app.table.loaded_at.is_some());
    }

    #[test]
    fn test_draw_renders_page() {
        let mut app = loaded_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| {
                app.draw(frame, frame.area()).unwrap();
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Authors (3)"));
        assert!(text.contains("1 – 3 of 3"));
        assert!(text.contains("Bob"));
    }
}
