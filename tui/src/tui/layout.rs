use eyre::{
    bail,
    Result,
};
use ratatui::{
    layout::{
        Constraint,
        Direction,
        Flex,
        Layout,
    },
    prelude::Rect,
};

/// Split the screen: nav header and main content
pub(crate) fn header_and_main_area(area: Rect) -> Result<[Rect; 2]> {
    let constraints = vec![
        Constraint::Max(2), // Header
        Constraint::Min(0), // Main area
    ];

    let [header_area, area] = *Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
    else {
        bail!("Failed to split the area");
    };

    Ok([header_area, area])
}

/// Split the main area into the session summary and the participant table below it
pub(crate) fn header_summary_and_table(area: Rect) -> Result<[Rect; 3]> {
    let [header, area] = header_and_main_area(area)?;
    let [summary, table] = *Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area)
    else {
        bail!("Failed to split the area");
    };
    Ok([header, summary, table])
}

/// Centers a [`Rect`] within another [`Rect`] using the provided [`Constraint`]s.
pub(crate) fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal]).flex(Flex::Center).areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}
