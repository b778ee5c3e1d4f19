#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    SwitchFocus,
    NextName,
    PrevName,
    Visualize,
    EnterFilterMode,
    ExitFilterMode,
    ClearFilter,
    UpdateFilter(String),
    ZoomIn,
    ZoomOut,
    ResetView,
    OpenImage,
    ToggleHelp,
    Refresh,
    SelectAt(u16, u16),
    None,
}
