pub mod app;
pub mod ui;

use std::io;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::{App, Mode};

pub fn run(api_url: &str) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(api_url)?;
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(std::time::Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.mode {
            Mode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char('a') => app.enter_add_mode(),
                KeyCode::Char('e') => app.enter_edit_mode(),
                KeyCode::Char('d') => app.request_delete(),
                KeyCode::Char('f') => app.cycle_filter(),
                KeyCode::Char('r') => app.refresh(),
                _ => {}
            },

            Mode::AddingTitle | Mode::AddingDescription => match key.code {
                KeyCode::Enter => app.advance_add(),
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                _ => {}
            },

            Mode::Editing { .. } => match key.code {
                KeyCode::Char('s') => app.cycle_edit_status(),
                KeyCode::Char('p') => app.cycle_edit_priority(),
                KeyCode::Enter => app.commit_edit(),
                KeyCode::Esc => app.cancel_input(),
                _ => {}
            },

            Mode::ConfirmDelete => match key.code {
                KeyCode::Char('y') => app.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Esc => app.cancel_input(),
                _ => {}
            },
        }
    }
}
