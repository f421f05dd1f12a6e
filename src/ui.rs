use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use sfinance::expense::DATE_FORMAT;
use sfinance::{
    Category, CategoryFilter, ExpenseFilter, ExpenseStore, QueryResult, StoreError, TimeFilter,
    ValidationError, ALL_CATEGORIES,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    AddExpense,
    Evaluate,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::AddExpense => Page::Evaluate,
            Page::Evaluate => Page::AddExpense,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::AddExpense => "Add Expense",
            Page::Evaluate => "Evaluate Data",
        }
    }
}

// ============================================================================
// ADD EXPENSE FORM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Description,
    Category,
    Date,
    Amount,
    Comment,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::Description,
        FormField::Category,
        FormField::Date,
        FormField::Amount,
        FormField::Comment,
    ];

    fn label(&self) -> &'static str {
        match self {
            FormField::Description => "Expense Description",
            FormField::Category => "Category",
            FormField::Date => "Date (YYYY-MM-DD)",
            FormField::Amount => "Amount",
            FormField::Comment => "Comment (Optional)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpenseForm {
    pub description: String,
    pub category: Category,
    pub date: String,
    pub amount: String,
    pub comment: String,
    pub focus: FormField,
}

impl ExpenseForm {
    fn new(today: NaiveDate) -> Self {
        Self {
            description: String::new(),
            category: Category::default(),
            date: today.format(DATE_FORMAT).to_string(),
            amount: String::new(),
            comment: String::new(),
            focus: FormField::Description,
        }
    }

    /// Clear after a successful insert. Category stays selected.
    fn reset(&mut self, today: NaiveDate) {
        self.description.clear();
        self.amount.clear();
        self.comment.clear();
        self.date = today.format(DATE_FORMAT).to_string();
        self.focus = FormField::Description;
    }

    fn focus_next(&mut self) {
        self.focus = cycle(&FormField::ORDER, self.focus, 1);
    }

    fn focus_previous(&mut self) {
        self.focus = cycle(&FormField::ORDER, self.focus, -1);
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Description => Some(&mut self.description),
            FormField::Category => None,
            FormField::Date => Some(&mut self.date),
            FormField::Amount => Some(&mut self.amount),
            FormField::Comment => Some(&mut self.comment),
        }
    }

    fn value(&self, field: FormField) -> String {
        match field {
            FormField::Description => self.description.clone(),
            FormField::Category => format!("◀ {} ▶", self.category),
            FormField::Date => self.date.clone(),
            FormField::Amount => self.amount.clone(),
            FormField::Comment => self.comment.clone(),
        }
    }
}

// ============================================================================
// EVALUATE FILTER PANEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeKind {
    Day,
    Week,
    Month,
    CustomRange,
}

impl TimeKind {
    const ORDER: [TimeKind; 4] = [
        TimeKind::Day,
        TimeKind::Week,
        TimeKind::Month,
        TimeKind::CustomRange,
    ];

    fn name(&self) -> &'static str {
        match self {
            TimeKind::Day => "Day",
            TimeKind::Week => "Week",
            TimeKind::Month => "Month",
            TimeKind::CustomRange => "Custom Range",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Kind,
    Category,
    Date,
    Month,
    Start,
    End,
}

impl FilterField {
    fn label(&self) -> &'static str {
        match self {
            FilterField::Kind => "Time Filter",
            FilterField::Category => "Category",
            FilterField::Date => "Date",
            FilterField::Month => "Month (MM/YYYY)",
            FilterField::Start => "Start Date",
            FilterField::End => "End Date",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterForm {
    pub kind: TimeKind,
    /// Index into `App::categories` (0 is the "All Categories" sentinel)
    pub category_idx: usize,
    pub date: String,
    pub month: String,
    pub start: String,
    pub end: String,
    pub focus: FilterField,
}

impl FilterForm {
    fn new(today: NaiveDate) -> Self {
        let today_str = today.format(DATE_FORMAT).to_string();

        Self {
            kind: TimeKind::Day,
            category_idx: 0,
            date: today_str.clone(),
            month: format!("{:02}/{:04}", today.month(), today.year()),
            start: today_str.clone(),
            end: today_str,
            focus: FilterField::Kind,
        }
    }

    /// Only the inputs relevant to the selected time kind are shown
    pub fn visible_fields(&self) -> Vec<FilterField> {
        let mut fields = vec![FilterField::Kind, FilterField::Category];
        match self.kind {
            TimeKind::Day | TimeKind::Week => fields.push(FilterField::Date),
            TimeKind::Month => fields.push(FilterField::Month),
            TimeKind::CustomRange => {
                fields.push(FilterField::Start);
                fields.push(FilterField::End);
            }
        }
        fields
    }

    fn focus_next(&mut self) {
        self.focus = cycle(&self.visible_fields(), self.focus, 1);
    }

    fn focus_previous(&mut self) {
        self.focus = cycle(&self.visible_fields(), self.focus, -1);
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FilterField::Kind | FilterField::Category => None,
            FilterField::Date => Some(&mut self.date),
            FilterField::Month => Some(&mut self.month),
            FilterField::Start => Some(&mut self.start),
            FilterField::End => Some(&mut self.end),
        }
    }

    pub fn build(&self, categories: &[String]) -> Result<ExpenseFilter, ValidationError> {
        let time = match self.kind {
            TimeKind::Day => TimeFilter::day(&self.date)?,
            TimeKind::Week => TimeFilter::week(&self.date)?,
            TimeKind::Month => TimeFilter::month_from_str(&self.month)?,
            TimeKind::CustomRange => TimeFilter::custom_range(&self.start, &self.end)?,
        };

        let category = categories
            .get(self.category_idx)
            .map(|selection| CategoryFilter::from_selection(selection))
            .unwrap_or_default();

        Ok(ExpenseFilter::new(time).with_category(category))
    }
}

fn cycle<T: Copy + PartialEq>(items: &[T], current: T, step: isize) -> T {
    let len = items.len() as isize;
    let idx = items.iter().position(|i| *i == current).unwrap_or(0) as isize;
    items[((idx + step).rem_euclid(len)) as usize]
}

// ============================================================================
// APP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

pub struct App<'a> {
    store: &'a ExpenseStore,
    today: NaiveDate,
    pub current_page: Page,
    pub form: ExpenseForm,
    pub filter: FilterForm,
    /// Category selector entries, sentinel first
    pub categories: Vec<String>,
    pub result: QueryResult,
    pub state: TableState,
    pub total_count: i64,
    pub notice: Option<Notice>,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(store: &'a ExpenseStore) -> Result<Self> {
        Self::with_today(store, chrono::Local::now().date_naive())
    }

    pub fn with_today(store: &'a ExpenseStore, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            store,
            today,
            current_page: Page::AddExpense,
            form: ExpenseForm::new(today),
            filter: FilterForm::new(today),
            categories: store.category_options()?,
            result: QueryResult::default(),
            state: TableState::default(),
            total_count: store.count()?,
            notice: None,
            should_quit: false,
        })
    }

    fn reload_categories(&mut self) -> Result<()> {
        let selected = self.categories.get(self.filter.category_idx).cloned();
        self.categories = self.store.category_options()?;
        self.filter.category_idx = selected
            .and_then(|s| self.categories.iter().position(|c| *c == s))
            .unwrap_or(0);
        self.total_count = self.store.count()?;
        Ok(())
    }

    pub fn submit_expense(&mut self) -> Result<()> {
        let inserted = self.store.insert(
            &self.form.description,
            self.form.category,
            &self.form.date,
            &self.form.amount,
            &self.form.comment,
        );

        match inserted {
            Ok(_) => {
                self.notice = Some(Notice::Success("Expense added successfully!".to_string()));
                self.form.reset(self.today);
                self.reload_categories()?;
            }
            Err(StoreError::Validation(err)) => {
                self.notice = Some(Notice::Error(validation_message(&err)));
            }
            Err(err) => return Err(err.into()),
        }

        Ok(())
    }

    pub fn apply_filter(&mut self) -> Result<()> {
        let filter = match self.filter.build(&self.categories) {
            Ok(filter) => filter,
            Err(err) => {
                self.notice = Some(Notice::Error(err.to_string()));
                return Ok(());
            }
        };

        self.result = self.store.query(&filter)?;
        self.notice = None;

        // Reset selection to first item
        if self.result.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }

        Ok(())
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.notice = None;
    }

    pub fn next(&mut self) {
        let len = self.result.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i < len - 1 => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.result.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::F(1) => self.current_page = Page::AddExpense,
            KeyCode::F(2) => self.current_page = Page::Evaluate,
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.next_page()
            }
            _ => match self.current_page {
                Page::AddExpense => self.handle_form_key(key)?,
                Page::Evaluate => self.handle_filter_key(key)?,
            },
        }

        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => self.submit_expense()?,
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_previous(),
            KeyCode::Left if self.form.focus == FormField::Category => {
                self.form.category = self.form.category.previous()
            }
            KeyCode::Right if self.form.focus == FormField::Category => {
                self.form.category = self.form.category.next()
            }
            KeyCode::Backspace => {
                if let Some(text) = self.form.text_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.form.text_mut() {
                    text.push(c);
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter => self.apply_filter()?,
            KeyCode::Tab => self.filter.focus_next(),
            KeyCode::BackTab => self.filter.focus_previous(),
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            KeyCode::Left | KeyCode::Right => {
                let step = if key.code == KeyCode::Right { 1 } else { -1 };
                match self.filter.focus {
                    FilterField::Kind => {
                        self.filter.kind = cycle(&TimeKind::ORDER, self.filter.kind, step)
                    }
                    FilterField::Category if !self.categories.is_empty() => {
                        let len = self.categories.len() as isize;
                        self.filter.category_idx =
                            (self.filter.category_idx as isize + step).rem_euclid(len) as usize;
                    }
                    _ => {}
                }
            }
            KeyCode::Backspace => {
                if let Some(text) = self.filter.text_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.filter.text_mut() {
                    text.push(c);
                }
            }
            _ => {}
        }

        Ok(())
    }
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::EmptyDescription => "Please fill out all fields.".to_string(),
        ValidationError::InvalidAmount(_) => "Please enter a valid amount.".to_string(),
        other => other.to_string(),
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key)?;
            }
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::AddExpense => render_form(f, chunks[1], app),
        Page::Evaluate => render_evaluate(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in [Page::AddExpense, Page::Evaluate].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("F{} {}", i + 1, page.title()), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Stored: {}", app.total_count),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(Line::from(tab_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" sFinance "),
    );

    f.render_widget(header, area);
}

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let marker = if focused { "→ " } else { "  " };
    let cursor = if focused { "▏" } else { "" };

    Line::from(vec![
        Span::styled(format!("{}{:<22}", marker, format!("{}:", label)), label_style),
        Span::raw(value),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ])
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from("")];
    for field in FormField::ORDER {
        lines.push(field_line(
            field.label(),
            app.form.value(field),
            app.form.focus == field,
        ));
        lines.push(Line::from(""));
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Add Expense "),
    );

    f.render_widget(form, area);
}

fn render_evaluate(f: &mut Frame, area: Rect, app: &mut App) {
    let visible = app.filter.visible_fields();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(visible.len() as u16 + 2), // Filter panel
            Constraint::Min(0),                           // Results
            Constraint::Length(3),                        // Total
        ])
        .split(area);

    let lines: Vec<Line> = visible
        .iter()
        .map(|field| {
            let value = match field {
                FilterField::Kind => format!("◀ {} ▶", app.filter.kind.name()),
                FilterField::Category => format!(
                    "◀ {} ▶",
                    app.categories
                        .get(app.filter.category_idx)
                        .map(String::as_str)
                        .unwrap_or(ALL_CATEGORIES)
                ),
                FilterField::Date => app.filter.date.clone(),
                FilterField::Month => app.filter.month.clone(),
                FilterField::Start => app.filter.start.clone(),
                FilterField::End => app.filter.end.clone(),
            };
            field_line(field.label(), value, app.filter.focus == *field)
        })
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Filter "),
    );
    f.render_widget(panel, chunks[0]);

    render_table(f, chunks[1], app);

    let total = Paragraph::new(Line::from(vec![
        Span::styled("Total Sum: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("{} €", app.result.total_display()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("   ({} rows)", app.result.len())),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(total, chunks[2]);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Description", "Category", "Date", "Amount (€)", "Comment"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.result.rows.iter().map(|expense| {
        let cells = vec![
            Cell::from(truncate(&expense.description, 30)),
            Cell::from(truncate(&expense.category, 16)),
            Cell::from(expense.date.clone()),
            Cell::from(expense.amount_display()).style(Style::default().fg(Color::Red)),
            Cell::from(truncate(&expense.comment, 30)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(32),
            Constraint::Length(18),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Expenses "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.notice {
        Some(Notice::Success(msg)) => Line::from(Span::styled(
            format!("✓ {}", msg),
            Style::default().fg(Color::Green),
        )),
        Some(Notice::Error(msg)) => Line::from(Span::styled(
            format!("✗ {}", msg),
            Style::default().fg(Color::Red),
        )),
        None => {
            let hints = match app.current_page {
                Page::AddExpense => "Tab/↑↓: field | ←→: category | Enter: add | F2: evaluate | Esc: quit",
                Page::Evaluate => "Tab: field | ←→: choose | Enter: apply | ↑↓: rows | F1: add | Esc: quit",
            };
            Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
        }
    };

    let status = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_add_expense_through_form() {
        let store = ExpenseStore::open_in_memory().unwrap();
        let mut app = App::with_today(&store, day(2024, 3, 15)).unwrap();

        type_text(&mut app, "Lunch");
        press(&mut app, KeyCode::Tab); // category
        press(&mut app, KeyCode::Tab); // date, pre-filled
        press(&mut app, KeyCode::Tab); // amount
        type_text(&mut app, "12,50");
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.notice,
            Some(Notice::Success("Expense added successfully!".to_string()))
        );
        assert_eq!(app.total_count, 1);
        assert_eq!(app.categories, vec![ALL_CATEGORIES, "Food"]);
        // Form cleared, date back to today
        assert!(app.form.description.is_empty());
        assert!(app.form.amount.is_empty());
        assert_eq!(app.form.date, "2024-03-15");
    }

    #[test]
    fn test_form_rejects_missing_description() {
        let store = ExpenseStore::open_in_memory().unwrap();
        let mut app = App::with_today(&store, day(2024, 3, 15)).unwrap();

        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.notice,
            Some(Notice::Error("Please fill out all fields.".to_string()))
        );
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_evaluate_month_with_category() {
        let store = ExpenseStore::open_in_memory().unwrap();
        store.insert("Lunch", Category::Food, "2024-03-15", "12.50", "").unwrap();
        store.insert("Train", Category::Transport, "2024-03-20", "8.00", "").unwrap();
        let mut app = App::with_today(&store, day(2024, 3, 1)).unwrap();

        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Right); // Week
        press(&mut app, KeyCode::Right); // Month
        assert_eq!(app.filter.kind, TimeKind::Month);
        assert_eq!(app.filter.month, "03/2024");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.result.len(), 2);
        assert_eq!(app.result.total_display(), "20.50");
        assert_eq!(app.state.selected(), Some(0));

        press(&mut app, KeyCode::Tab); // category selector
        let food = app.categories.iter().position(|c| c == "Food").unwrap();
        for _ in 0..food {
            press(&mut app, KeyCode::Right);
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.result.len(), 1);
        assert_eq!(app.result.total_display(), "12.50");
    }

    #[test]
    fn test_visible_fields_follow_kind() {
        let mut form = FilterForm::new(day(2024, 3, 1));
        assert_eq!(form.visible_fields().last(), Some(&FilterField::Date));

        form.kind = TimeKind::CustomRange;
        assert_eq!(
            form.visible_fields(),
            vec![
                FilterField::Kind,
                FilterField::Category,
                FilterField::Start,
                FilterField::End
            ]
        );
    }

    #[test]
    fn test_bad_filter_input_shows_error() {
        let store = ExpenseStore::open_in_memory().unwrap();
        let mut app = App::with_today(&store, day(2024, 3, 1)).unwrap();

        app.current_page = Page::Evaluate;
        app.filter.date = "yesterday".to_string();
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.notice, Some(Notice::Error(_))));
        assert!(app.result.is_empty());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long description", 10), "a very ...");
    }
}
