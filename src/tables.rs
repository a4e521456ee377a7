use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{costing::EPSILON, plan::ProductionPlan},
    quantity::power::Megawatts,
};

pub fn build_plan_table(plan: &ProductionPlan) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Name", "Type", "Marginal cost", "Capacity", "Power"]);
    for entry in &plan.entries {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(entry.kind).add_attribute(Attribute::Dim),
            Cell::new(entry.marginal_cost).set_alignment(CellAlignment::Right),
            Cell::new(entry.effective_p_max).set_alignment(CellAlignment::Right),
            Cell::new(entry.power).set_alignment(CellAlignment::Right).fg(
                if entry.power <= Megawatts::ZERO {
                    Color::DarkGrey
                } else if entry.power >= entry.effective_p_max - EPSILON {
                    Color::Green
                } else {
                    Color::DarkYellow
                },
            ),
        ]);
    }
    table
}
