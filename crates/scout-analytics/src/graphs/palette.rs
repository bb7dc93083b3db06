/// Team colours in selection order.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Colour for the team at `index` in the selection, cycling through the palette.
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}
