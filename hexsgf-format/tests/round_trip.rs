//! Write-then-read tests across the format crate
//!
//! Trees are generated from a seeded RNG so failures reproduce.

use hexsgf_core::{GameInfo, GameTree, HexPoint, Move, NodeId, Player, Stone};
use hexsgf_format::{parse_sgf, to_sgf_string, WriterConfig};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

const COMMENT_CHARS: &[char] = &['a', 'b', 'z', ' ', '\n', '[', ']', ':', '\\', 'é'];
const VALUE_CHARS: &[char] = &['x', 'y', '1', ' ', ':', '[', ']', '\\'];
const EXTRA_KEYS: &[&str] = &["GN", "PB", "PW", "RE", "N"];

fn random_text(rng: &mut ChaCha8Rng, alphabet: &[char]) -> String {
    let len = rng.gen_range(1..12);
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

fn random_cell(rng: &mut ChaCha8Rng, info: &GameInfo) -> HexPoint {
    let x = rng.gen_range(0..info.board_width) as i32;
    let y = rng.gen_range(0..info.board_height) as i32;
    HexPoint::by_coords(x, y).unwrap()
}

fn random_move(rng: &mut ChaCha8Rng, info: &GameInfo) -> Move {
    let player = if rng.gen_bool(0.5) { Player::Black } else { Player::White };
    let point = match rng.gen_range(0..10) {
        0 => HexPoint::SWAP_SIDES,
        1 => HexPoint::PASS,
        2 => HexPoint::RESIGN,
        _ => random_cell(rng, info),
    };
    Move::new(point, player)
}

fn decorate(rng: &mut ChaCha8Rng, tree: &mut GameTree, id: NodeId, info: &GameInfo) {
    if rng.gen_bool(0.3) {
        let comment = random_text(rng, COMMENT_CHARS);
        tree.get_mut(id).set_comment(comment);
    }
    if rng.gen_bool(0.2) {
        let key = EXTRA_KEYS[rng.gen_range(0..EXTRA_KEYS.len())];
        let value = random_text(rng, VALUE_CHARS);
        tree.get_mut(id).set_property(key, value);
    }
    if rng.gen_bool(0.15) {
        for stone in [Stone::Black, Stone::White, Stone::Empty] {
            let point = random_cell(rng, info);
            tree.get_mut(id).add_setup(stone, point);
        }
    }
    if rng.gen_bool(0.1) {
        let label = format!("{}:{}", random_cell(rng, info), random_text(rng, VALUE_CHARS));
        tree.get_mut(id).add_label(label);
    }
}

/// Grow children in pre-order so arena ids match the order the reader assigns
fn grow(rng: &mut ChaCha8Rng, tree: &mut GameTree, id: NodeId, info: &GameInfo, depth: usize) {
    if depth == 0 {
        return;
    }
    let children = match rng.gen_range(0..10) {
        0..=1 => 0,
        2..=7 => 1,
        _ => rng.gen_range(2..4),
    };
    for _ in 0..children {
        let child = tree.push_child(id, Some(random_move(rng, info)));
        decorate(rng, tree, child, info);
        grow(rng, tree, child, info, depth - 1);
    }
}

fn random_game(seed: u64) -> (GameTree, GameInfo) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let info = GameInfo::new(rng.gen_range(1..20), rng.gen_range(1..20));
    let mut tree = GameTree::new();
    let root = tree.root();
    decorate(&mut rng, &mut tree, root, &info);
    grow(&mut rng, &mut tree, root, &info, 8);
    (tree, info)
}

/// Drop the header keys the reader stores on the root
fn strip_header(tree: &mut GameTree) {
    let root = tree.root();
    for key in ["FF", "AP", "GM", "SZ"] {
        tree.get_mut(root).unset_property(key);
    }
}

// ============================================================================
// ROUND TRIPS
// ============================================================================

#[test]
fn test_random_trees_round_trip() {
    let config = WriterConfig::default();
    for seed in 0..50 {
        let (tree, info) = random_game(seed);
        let text = to_sgf_string(&tree, &info, &config);

        let mut game = parse_sgf(&text).unwrap_or_else(|e| panic!("seed {seed}: {e}\n{text}"));
        assert_eq!(game.info, info, "seed {seed}");
        assert!(game.warnings.is_empty(), "seed {seed}: {:?}", game.warnings);

        strip_header(&mut game.tree);
        assert_eq!(
            game.tree.dump(game.tree.root()),
            tree.dump(tree.root()),
            "seed {seed}\n{text}"
        );
    }
}

#[test]
fn test_output_is_stable() {
    let config = WriterConfig::default().with_line_width(40);
    for seed in 100..120 {
        let (tree, info) = random_game(seed);
        let first = to_sgf_string(&tree, &info, &config);
        let game = parse_sgf(&first).unwrap();
        let second = to_sgf_string(&game.tree, &game.info, &config);
        assert_eq!(first, second, "seed {seed}");
    }
}

#[test]
fn test_deep_variation_tree_round_trip() {
    let plies = 100_000;
    let info = GameInfo::square(11);
    let mut tree = GameTree::new();
    let mut current = tree.root();
    for ply in 0..plies {
        let player = if ply % 2 == 0 { Player::Black } else { Player::White };
        let cell = HexPoint::by_coords((ply % 11) as i32, (ply / 11 % 11) as i32).unwrap();
        let next = tree.push_child(current, Some(Move::new(cell, player)));
        tree.push_child(current, Some(Move::new(HexPoint::PASS, player)));
        current = next;
    }

    let text = to_sgf_string(&tree, &info, &WriterConfig::default());
    let game = parse_sgf(&text).unwrap();

    assert_eq!(game.tree.node_count(), 2 * plies + 1);
    let moves = |t: &GameTree| -> Vec<Move> {
        t.main_line().into_iter().filter_map(|id| t.get(id).mv()).collect()
    };
    assert_eq!(moves(&game.tree), moves(&tree));
}

#[test]
fn test_comment_escapes_survive() {
    let mut tree = GameTree::new();
    let child = tree.push_child(tree.root(), None);
    let comment = "brackets [a1] colons a:b backslash \\ and\nnewline";
    tree.get_mut(child).set_comment(comment);

    let text = to_sgf_string(&tree, &GameInfo::square(11), &WriterConfig::default());
    let game = parse_sgf(&text).unwrap();
    let parsed = game.tree.first_child(game.tree.root()).unwrap();
    assert_eq!(game.tree.get(parsed).comment(), Some(comment));
}

#[test]
fn test_hexgui_swap_record_normalized() {
    let old = "(;FF[4]AP[HexGui:0.9]GM[11]SZ[11];B[f6];W[swap-pieces];B[e5])";
    let game = parse_sgf(old).unwrap();
    let text = to_sgf_string(&game.tree, &game.info, &WriterConfig::default());
    assert!(text.contains("W[swap-sides]"));
    assert!(!text.contains("HexGui"));

    let again = parse_sgf(&text).unwrap();
    let line = again.tree.main_line();
    assert_eq!(again.tree.get(line[2]).mv().unwrap().point(), HexPoint::SWAP_SIDES);
    assert_eq!(again.tree.player_to_move(line[2]), Player::White);
}
