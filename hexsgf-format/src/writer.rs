//! Game record writer
//!
//! Output is assembled token by token in a line buffer. A token that would
//! push a non-empty line past the configured width starts a new line.
//! Nothing is written to the sink until the whole record is rendered.

use std::io::Write;

use hexsgf_core::tree::COMMENT_KEY;
use hexsgf_core::{GameInfo, GameTree, HexPoint, Move, NodeId, Stone};

use crate::config::{WriterConfig, FORMAT_VERSION, HEX_GAME_TYPE};

/// Keys the writer emits itself at the root
const ROOT_KEYS: [&str; 4] = ["FF", "AP", "GM", "SZ"];

/// Write `tree` with the default configuration
pub fn write_sgf<W: Write>(out: W, tree: &GameTree, info: &GameInfo) -> std::io::Result<()> {
    write_sgf_with(out, tree, info, &WriterConfig::default())
}

/// Write `tree` with explicit settings
pub fn write_sgf_with<W: Write>(
    mut out: W,
    tree: &GameTree,
    info: &GameInfo,
    config: &WriterConfig,
) -> std::io::Result<()> {
    let text = to_sgf_string(tree, info, config);
    out.write_all(text.as_bytes())?;
    out.flush()
}

/// Render `tree` as record text
pub fn to_sgf_string(tree: &GameTree, info: &GameInfo, config: &WriterConfig) -> String {
    let mut writer = SgfWriter::new(tree, info, config);
    writer.write_tree(tree.root());
    writer.finish()
}

// ============================================================================
// WRITER STATE
// ============================================================================

enum Pending {
    Variation(NodeId),
    Close,
}

struct SgfWriter<'a> {
    tree: &'a GameTree,
    info: &'a GameInfo,
    config: &'a WriterConfig,
    output: String,
    line: String,
    line_chars: usize,
}

impl<'a> SgfWriter<'a> {
    fn new(tree: &'a GameTree, info: &'a GameInfo, config: &'a WriterConfig) -> Self {
        Self {
            tree,
            info,
            config,
            output: String::new(),
            line: String::with_capacity(128),
            line_chars: 0,
        }
    }

    fn finish(mut self) -> String {
        self.output.push_str(&self.line);
        self.output.push('\n');
        self.output
    }

    fn print(&mut self, token: &str) {
        let len = token.chars().count();
        if self.line_chars > 0 && self.line_chars + len > self.config.line_width {
            self.output.push_str(&self.line);
            self.output.push('\n');
            self.line.clear();
            self.line_chars = 0;
        }
        self.line.push_str(token);
        self.line_chars += len;
    }

    fn print_property(&mut self, key: &str, value: &str) {
        self.print(&format!("{}[{}]", key, value));
    }

    // ========================================================================
    // STRUCTURE
    // ========================================================================

    /// Write the tree under `start`
    ///
    /// A single child continues the current sequence; several children
    /// each open a parenthesized variation. Pending variations live on an
    /// explicit stack so nesting depth does not grow the call stack.
    fn write_tree(&mut self, start: NodeId) {
        let tree = self.tree;
        let mut pending = vec![Pending::Variation(start)];

        while let Some(step) = pending.pop() {
            let mut current = match step {
                Pending::Close => {
                    self.print(")");
                    continue;
                }
                Pending::Variation(id) => id,
            };

            self.print("(");
            pending.push(Pending::Close);
            loop {
                self.write_node_body(current, current == tree.root());
                match tree.get(current).children() {
                    [] => break,
                    [only] => current = *only,
                    children => {
                        pending.extend(children.iter().rev().map(|&c| Pending::Variation(c)));
                        break;
                    }
                }
            }
        }
    }

    fn write_node_body(&mut self, id: NodeId, is_root: bool) {
        let tree = self.tree;
        let node = tree.get(id);
        self.print(";");

        if is_root {
            self.print_property("FF", FORMAT_VERSION);
            self.print_property("AP", &self.config.application_id());
            self.print_property("GM", &HEX_GAME_TYPE.to_string());
            self.print_property("SZ", &self.info.size_value());
        }

        if let Some(mv) = node.mv() {
            self.print_move(mv);
        }

        for (key, value) in node.properties() {
            if is_root && ROOT_KEYS.contains(&key) {
                continue;
            }
            if key == COMMENT_KEY {
                if !value.is_empty() {
                    self.print_property(key, &escape_comment(value));
                }
            } else {
                self.print_property(key, &escape_value(value));
            }
        }

        for stone in [Stone::Black, Stone::White, Stone::Empty] {
            let points = node.setup(stone);
            if !points.is_empty() {
                self.print(stone.setup_key());
                self.print_point_list(&points);
            }
        }

        if node.has_label() {
            self.print("LB");
            for label in node.labels() {
                self.print(&format!("[{}]", escape_value(label)));
            }
        }
    }

    fn print_move(&mut self, mv: Move) {
        self.print_property(mv.player().sgf_key(), mv.point().name());
    }

    fn print_point_list(&mut self, points: &[HexPoint]) {
        for point in points {
            self.print(&format!("[{}]", point.name()));
        }
    }
}

// ============================================================================
// ESCAPING
// ============================================================================

/// Comments escape every character the reader treats specially
fn escape_comment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '[' | ']' | ':') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Other values escape only what would end or corrupt the value
fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hexsgf_core::Player;

    fn point(name: &str) -> HexPoint {
        HexPoint::by_name(name).unwrap()
    }

    fn config() -> WriterConfig {
        WriterConfig::default().with_application("test", "1")
    }

    fn render(tree: &GameTree, info: &GameInfo) -> String {
        to_sgf_string(tree, info, &config())
    }

    #[test]
    fn test_root_header() {
        let tree = GameTree::new();
        assert_eq!(
            render(&tree, &GameInfo::square(11)),
            "(;FF[4]AP[test:1]GM[11]SZ[11])\n"
        );
        assert_eq!(
            render(&tree, &GameInfo::new(9, 7)),
            "(;FF[4]AP[test:1]GM[11]SZ[9:7])\n"
        );
    }

    #[test]
    fn test_root_keys_not_repeated() {
        let mut tree = GameTree::new();
        let root = tree.root();
        tree.get_mut(root).set_property("FF", "3");
        tree.get_mut(root).set_property("AP", "HexGui:0.9");
        tree.get_mut(root).set_property("SZ", "13");
        tree.get_mut(root).set_property("GN", "final");
        assert_eq!(
            render(&tree, &GameInfo::square(11)),
            "(;FF[4]AP[test:1]GM[11]SZ[11]GN[final])\n"
        );
    }

    #[test]
    fn test_single_child_continues() {
        let mut tree = GameTree::new();
        let a = tree.push_child(tree.root(), Some(Move::new(point("a1"), Player::Black)));
        tree.push_child(a, Some(Move::new(HexPoint::SWAP_SIDES, Player::White)));
        assert_eq!(
            render(&tree, &GameInfo::square(5)),
            "(;FF[4]AP[test:1]GM[11]SZ[5];B[a1];W[swap-sides])\n"
        );
    }

    #[test]
    fn test_variations_nested() {
        let mut tree = GameTree::new();
        let root = tree.root();
        tree.push_child(root, Some(Move::new(point("a1"), Player::Black)));
        let b = tree.push_child(root, Some(Move::new(point("b2"), Player::Black)));
        tree.push_child(b, Some(Move::new(point("c3"), Player::White)));
        assert_eq!(
            render(&tree, &GameInfo::square(5)),
            "(;FF[4]AP[test:1]GM[11]SZ[5](;B[a1])(;B[b2];W[c3]))\n"
        );
    }

    #[test]
    fn test_non_root_keeps_all_properties() {
        let mut tree = GameTree::new();
        let child = tree.push_child(tree.root(), None);
        tree.get_mut(child).set_property("SZ", "7");
        let text = render(&tree, &GameInfo::square(5));
        assert!(text.ends_with(";SZ[7])\n"));
    }

    #[test]
    fn test_empty_comment_skipped() {
        let mut tree = GameTree::new();
        let child = tree.push_child(tree.root(), None);
        tree.get_mut(child).set_comment("");
        let text = render(&tree, &GameInfo::square(5));
        assert!(text.ends_with("SZ[5];)\n"));
    }

    #[test]
    fn test_setup_and_labels() {
        let mut tree = GameTree::new();
        let root = tree.root();
        let node = tree.get_mut(root);
        node.add_setup(Stone::White, point("c3"));
        node.add_setup(Stone::Black, point("b2"));
        node.add_setup(Stone::Black, point("a1"));
        node.add_setup(Stone::Empty, point("d4"));
        node.add_label("a1:X");
        let text = render(&tree, &GameInfo::square(5));
        assert_eq!(
            text,
            "(;FF[4]AP[test:1]GM[11]SZ[5]AB[a1][b2]AW[c3]AE[d4]LB[a1:X])\n"
        );
    }

    #[test]
    fn test_move_before_properties() {
        let mut tree = GameTree::new();
        let child = tree.push_child(tree.root(), Some(Move::new(point("e5"), Player::White)));
        tree.get_mut(child).set_comment("good");
        tree.get_mut(child).set_property("BR", "x");
        let text = render(&tree, &GameInfo::square(5));
        assert!(text.ends_with(";W[e5]BR[x]C[good])\n"));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_comment(r"a[b]c:d\e"), r"a\[b\]c\:d\\e");
        assert_eq!(escape_value(r"HexGui:0.9 [x] \y"), r"HexGui:0.9 [x\] \\y");
    }

    #[test]
    fn test_wrapping() {
        let mut tree = GameTree::new();
        let mut current = tree.root();
        for x in 0..11 {
            let player = if x % 2 == 0 { Player::Black } else { Player::White };
            let point = HexPoint::by_coords(x, x).unwrap();
            current = tree.push_child(current, Some(Move::new(point, player)));
        }
        let config = config().with_line_width(20);
        let text = to_sgf_string(&tree, &GameInfo::square(11), &config);

        assert!(text.ends_with(")\n"));
        for line in text.lines() {
            assert!(line.len() <= 20, "line too long: {line}");
        }
        assert!(text.lines().count() > 3);
        assert!(!text.contains("\n\n"));
    }

    #[test]
    fn test_write_to_sink() {
        let tree = GameTree::new();
        let mut out = Vec::new();
        write_sgf_with(&mut out, &tree, &GameInfo::square(5), &config()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "(;FF[4]AP[test:1]GM[11]SZ[5])\n");
    }

    #[test]
    fn test_tree_untouched() {
        let tree = GameTree::new();
        let before = tree.get(tree.root()).properties().count();
        render(&tree, &GameInfo::square(5));
        assert_eq!(tree.get(tree.root()).properties().count(), before);
    }
}
