use crate::board::{TRACK_LENGTH, TileKind};
use crate::engine::output::Output;
use crate::state::GameState;

const MAP_ROWS: usize = 8;
const MAP_COLS: usize = 29;

const HELP_TEXT: &[&str] = &[
    "Commands:",
    "  roll               roll the die and move",
    "  step N             move exactly N tiles",
    "  sell N             sell your property on tile N",
    "  block N | at N     place a barrier N tiles away (or on tile N)",
    "  bomb N | at N      place a bomb N tiles away (or on tile N)",
    "  robot              clear items on the next 10 tiles",
    "  query              show your holdings",
    "  status             show every player",
    "  map                draw the board",
    "  dump [file]        save the game (default dump.json)",
    "  load <file>        load a saved game",
    "  help               show this list",
    "  quit               leave the game",
];

pub fn render_help(out: &mut Output) {
    for line in HELP_TEXT {
        out.say(*line);
    }
}

pub fn render_query(out: &mut Output, state: &GameState, player: usize) {
    let Some(p) = state.players.get(player) else {
        return;
    };

    out.title(format!("{} (player {})", p.name, p.index + 1));
    out.say(format!(
        "Funds: {}  Credit: {}  Tile: {}",
        p.fund, p.credit, p.position
    ));
    out.say(format!(
        "Items: barrier {}, robot {}, bomb {} ({} total)",
        p.items.barrier,
        p.items.robot,
        p.items.bomb,
        p.items.total()
    ));
    out.say(format!(
        "Effects: fortune {}, hospital {}, prison {}",
        p.effects.fortune, p.effects.hospital, p.effects.prison
    ));

    let holdings: Vec<String> = state
        .owned_by(player)
        .map(|(tile, land)| {
            let district = match TileKind::of(tile) {
                Some(TileKind::Land(tier)) => tier.label(),
                _ => "land",
            };
            format!("tile {tile} ({district}, level {})", land.level)
        })
        .collect();
    if holdings.is_empty() {
        out.say("Properties: none");
    } else {
        out.say(format!("Properties: {}", holdings.join(", ")));
    }

    match state.fortune.location {
        Some(tile) => out.say(format!(
            "The God of Fortune waits on tile {tile} for {} more rounds.",
            state.fortune.duration
        )),
        None => out.say(format!(
            "The God of Fortune appears in {} rounds.",
            state.fortune.cooldown
        )),
    }
}

pub fn render_status(out: &mut Output, state: &GameState) {
    out.title("Players");
    for p in &state.players {
        let marker = if state.turn.current == Some(p.index) {
            '>'
        } else {
            ' '
        };
        let standing = if p.alive { "" } else { "  [bankrupt]" };
        out.say(format!(
            "{marker} {:<2} funds {:>6}  credit {:>4}  tile {:>2}  properties {}{standing}",
            p.name,
            p.fund,
            p.credit,
            p.position,
            state.owned_by(p.index).count()
        ));
    }
}

/// Grid cell for a tile. The track runs clockwise from the top-left corner.
fn grid_cell(tile: usize) -> (usize, usize) {
    match tile {
        0..=28 => (0, tile),
        29..=35 => (tile - 28, MAP_COLS - 1),
        36..=63 => (MAP_ROWS - 1, 63 - tile),
        _ => (70 - tile, 0),
    }
}

fn tile_glyph(state: &GameState, tile: usize) -> char {
    if let Some(hazard) = state.hazards.get(&tile) {
        return hazard.kind.symbol();
    }
    let land = &state.properties[tile];
    if land.owner.is_some() && land.level > 0 {
        return char::from(b'0' + land.level);
    }
    TileKind::of(tile).map(TileKind::symbol).unwrap_or(' ')
}

fn player_initial(name: &str) -> char {
    name.chars().next().unwrap_or('?')
}

/// Plain-text board. Players cover whatever sits on their tile; when several
/// share a tile the one who moved last is drawn.
pub fn render_map(out: &mut Output, state: &GameState) {
    let mut grid = [[' '; MAP_COLS]; MAP_ROWS];
    for tile in 0..TRACK_LENGTH {
        let (row, col) = grid_cell(tile);
        grid[row][col] = tile_glyph(state, tile);
    }

    let mut order: Vec<usize> = (0..state.players.len()).collect();
    if let Some(last) = state.turn.last {
        order.retain(|&i| i != last);
        order.push(last);
    }
    for i in order {
        let p = &state.players[i];
        if p.alive && p.position < TRACK_LENGTH {
            let (row, col) = grid_cell(p.position);
            grid[row][col] = player_initial(&p.name);
        }
    }

    for row in grid {
        out.say(row.iter().collect::<String>());
    }
    out.say("S start  H hospital  T item shop  G gift house  P prison  M magic house  $ mine");
    out.say("# barrier  @ bomb  1-3 property level");
}
