use crate::{
    config::DashboardConfig,
    join::join,
    render::Figure,
};
use super::{Command, CommandError, Datasets, Selection};

/// What the caller should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The selection changed; render again.
    Rerender,
    /// Render the unchanged selection.
    Show,
    Help,
    Quit,
}

/// Selector state over shared datasets. Every render recomputes the join from scratch.
#[derive(Debug)]
pub struct Dashboard<'a> {
    datasets: &'a Datasets,
    config: &'a DashboardConfig,
    selection: Selection,
}

impl<'a> Dashboard<'a> {
    pub fn new(datasets: &'a Datasets, config: &'a DashboardConfig) -> Self {
        Self { datasets, config, selection: Selection::latest(config.years) }
    }

    #[inline] pub fn selection(&self) -> &Selection { &self.selection }

    /// Apply one command to the selection. Rejected commands leave it unchanged.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, CommandError> {
        match command {
            Command::Crop(crop) => self.selection.crop = crop,
            Command::Year(year) => {
                let years = self.config.years;
                if !years.contains(year) {
                    return Err(CommandError::YearOutOfRange { year, first: years.first, last: years.last });
                }
                self.selection.year = year;
            }
            Command::Rivers(on) => self.selection.overlays.rivers = on,
            Command::Show => return Ok(Outcome::Show),
            Command::Help => return Ok(Outcome::Help),
            Command::Quit => return Ok(Outcome::Quit),
        }
        tracing::debug!("selection: {:?}", self.selection);
        Ok(Outcome::Rerender)
    }

    /// Join and render the current selection.
    pub fn render(&self) -> Figure<'a> {
        let selection = self.selection;
        let table = self.datasets.table(selection.crop);
        let view = join(&self.datasets.counties, table, selection.year);
        Figure::build(&view, &self.datasets.rivers, &selection, &self.config.map)
    }
}
