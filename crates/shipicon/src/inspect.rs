use bytesize::ByteSize;
use comfy_table::{
    Cell, CellAlignment, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS,
    presets::UTF8_FULL,
};
use pigfile::gamedata::GameData;

fn counts_table(data: &GameData) -> Table {
    let counts = &data.counts;

    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Table"),
            Cell::new("Count").set_alignment(CellAlignment::Right),
        ]);

    let rows = [
        ("Textures", counts.textures),
        ("Video clips", counts.vclips),
        ("Effects", counts.effects),
        ("Wall animations", counts.wall_anims),
        ("Robot types", counts.robot_types),
        ("Robot joints", counts.robot_joints),
        ("Weapon types", counts.weapon_types),
        ("Powerup types", counts.powerup_types),
        ("Polygon models", counts.polygon_models),
    ];

    for (name, count) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

fn models_table(data: &GameData) -> Table {
    let player = usize::try_from(data.player_model_num()).ok();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Model").set_alignment(CellAlignment::Center),
            Cell::new("Submodels").set_alignment(CellAlignment::Center),
            Cell::new("Roots").set_alignment(CellAlignment::Center),
            Cell::new("Bytecode").set_alignment(CellAlignment::Center),
            Cell::new("Radius").set_alignment(CellAlignment::Center),
            Cell::new("Textures").set_alignment(CellAlignment::Center),
            Cell::new("Notes").set_alignment(CellAlignment::Center),
        ]);

    for (index, model) in data.polymodels.iter().enumerate() {
        let header = &model.header;
        let textures = match header.n_textures {
            0 => "-".to_owned(),
            n => {
                let first = u32::from(header.first_texture);
                format!("{first}..{}", first + u32::from(n))
            }
        };

        table.add_row(vec![
            Cell::new(index),
            Cell::new(header.n_models).set_alignment(CellAlignment::Right),
            Cell::new(header.submodel_tree().roots().count()).set_alignment(CellAlignment::Right),
            Cell::new(format!("{}", ByteSize(model.data.len() as u64).display()))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", header.rad.to_f32())).set_alignment(CellAlignment::Right),
            Cell::new(textures).set_alignment(CellAlignment::Center),
            Cell::new(if player == Some(index) { "player ship" } else { "" }),
        ]);
    }

    table
}

/// Prints the table counts and the polygon model directory.
pub fn inspect(data: &GameData) {
    println!("{}", counts_table(data));
    println!("{}", models_table(data));
}
