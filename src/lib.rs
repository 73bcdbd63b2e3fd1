use std::fmt;
use std::time::{Duration, Instant};

use rand_xoshiro::rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub mod game_wrapper;
pub mod games;

/// A player in a two-player game. The numeric token is the value the
/// player's pieces carry in a board grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    /// Returns the other player.
    pub fn opponent(&self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The grid cell value for this player's ordinary pieces.
    pub fn token(&self) -> i32 {
        *self as i32
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "P1"),
            Player::Two => write!(f, "P2"),
        }
    }
}

/// The landing square reported by a successful [`GameState::drop_piece`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveResult {
    pub row: usize,
    pub col: usize,
    pub player: Player,
}

/// Why [`GameState::drop_piece`] rejected a move. The state is left
/// untouched in every case.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMove {
    #[error("column {0} is out of range")]
    InvalidColumn(usize),
    #[error("column {0} is full")]
    ColumnFull(usize),
    #[error("cell {0} is out of range")]
    InvalidCell(usize),
    #[error("cell {0} is already occupied")]
    CellOccupied(usize),
    #[error("square ({0}, {1}) is off the board")]
    OffBoard(usize, usize),
    #[error("move path needs at least two squares")]
    ShortPath,
    #[error("no piece of the moving player on ({0}, {1})")]
    NotOwnPiece(usize, usize),
}

/// A two-player, perfect-information game position. Must be cloneable so
/// the search can branch without touching the caller's state.
pub trait GameState: Clone {
    /// The type of a move in the game.
    type Move: Clone + Eq + std::hash::Hash + std::fmt::Debug;

    /// Returns every legal move for `player` in the game's canonical
    /// generation order. Empty when `player` has no move.
    fn valid_moves(&self, player: Player) -> Vec<Self::Move>;
    /// Applies a move for `player` and reports the landing square.
    fn drop_piece(&mut self, mv: &Self::Move, player: Player) -> Result<MoveResult, InvalidMove>;
    /// Returns whether the game has ended and, if so, who won.
    /// `(true, None)` is a draw.
    fn game_over(&self) -> (bool, Option<Player>);
}

/// A heuristic scoring function over positions of one game.
pub trait Evaluator<S: GameState> {
    /// Scores `state` from `player`'s perspective; larger is better for
    /// `player`. Terminal scores dominate heuristic ones.
    fn evaluate(&self, state: &S, player: Player) -> i32;
}

/// The backed-up score of one fully searched root move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveEvaluation<M> {
    pub mv: M,
    pub score: i32,
}

/// One explored node of the search tree.
#[derive(Debug, Clone, Serialize)]
pub struct SearchNode<M> {
    /// Move that led from the parent here; `None` at the root.
    pub mv: Option<M>,
    /// Backed-up minimax score of this node.
    pub score: i32,
    /// Plies between the root and this node.
    pub depth_from_root: u32,
    /// True when the root player is to move here.
    pub maximizing: bool,
    /// Explored children in visit order; pruned siblings never appear.
    pub children: Vec<SearchNode<M>>,
}

impl<M: Clone> SearchNode<M> {
    /// Walks the tree along backed-up scores and returns the expected
    /// line of play. At each node the first child carrying the extremal
    /// score for the side to move is followed; the walk stops at a
    /// childless node or a child with no move attached.
    pub fn principal_variation(&self) -> Vec<M> {
        let mut line = Vec::new();
        let mut current = self;
        while !current.children.is_empty() {
            let mut best = &current.children[0];
            for child in &current.children[1..] {
                if (current.maximizing && child.score > best.score)
                    || (!current.maximizing && child.score < best.score)
                {
                    best = child;
                }
            }
            match &best.mv {
                Some(mv) => line.push(mv.clone()),
                None => break,
            }
            current = best;
        }
        line
    }
}

/// Everything one search run reports besides the chosen move.
#[derive(Debug, Clone, Serialize)]
pub struct SearchDiagnostics<M> {
    /// Score of every root move evaluated before a cutoff, in visit order.
    pub evaluated_moves: Vec<MoveEvaluation<M>>,
    /// Depth the engine was configured with.
    pub search_depth: u32,
    /// Wall-clock time of the whole search.
    pub duration: Duration,
    /// Number of search calls made, leaves included.
    pub nodes_expanded: u64,
    /// Root of the explored tree; `None` when tree capture is off.
    pub search_tree: Option<SearchNode<M>>,
    /// Expected line of play extracted from the tree.
    pub principal_variation: Vec<M>,
}

struct SearchStats<M> {
    nodes_expanded: u64,
    evaluated_moves: Vec<MoveEvaluation<M>>,
}

impl<M> SearchStats<M> {
    fn new() -> Self {
        SearchStats {
            nodes_expanded: 0,
            evaluated_moves: Vec::new(),
        }
    }
}

/// Depth-limited minimax with alpha-beta pruning.
///
/// The search recurses on cloned states, scores every leaf from the root
/// player's perspective through the configured [`Evaluator`], and hands
/// back a [`SearchDiagnostics`] trace next to the chosen move. Ties are
/// broken toward the move generated first.
pub struct Minimax<S: GameState> {
    depth: u32,
    evaluator: Box<dyn Evaluator<S>>,
    capture_tree: bool,
}

impl<S: GameState> Minimax<S> {
    /// Creates an engine that searches `depth` plies deep with the given
    /// leaf evaluator.
    pub fn new(depth: u32, evaluator: Box<dyn Evaluator<S>>) -> Self {
        Minimax {
            depth,
            evaluator,
            capture_tree: true,
        }
    }

    /// Controls diagnostic tree retention, on by default. With capture
    /// off no tree nodes are allocated at all, so `search_tree` comes
    /// back `None` and the principal variation is empty; root move
    /// scores and node counts are still reported.
    pub fn with_tree_capture(mut self, capture: bool) -> Self {
        self.capture_tree = capture;
        self
    }

    /// The configured search depth in plies.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Searches from `state` with `player` to move and returns the
    /// chosen move plus the diagnostics of the run.
    ///
    /// When the recursion surfaces no move (terminal position, or depth
    /// zero) the first valid move is chosen as a fallback, `None` when
    /// there is none.
    pub fn choose_move(
        &self,
        state: &S,
        player: Player,
    ) -> (Option<S::Move>, SearchDiagnostics<S::Move>) {
        let start = Instant::now();
        let mut stats = SearchStats::new();

        let (score, best, root_node) =
            self.minimax(state, self.depth, true, i32::MIN, i32::MAX, None, player, &mut stats);

        let best = best.or_else(|| state.valid_moves(player).into_iter().next());

        let principal_variation = root_node
            .as_ref()
            .map(SearchNode::principal_variation)
            .unwrap_or_default();
        let duration = start.elapsed();

        debug!(
            search_depth = self.depth,
            duration_ms = duration.as_millis() as u64,
            nodes_expanded = stats.nodes_expanded,
            best_score = score,
            best_move = ?best,
            "minimax search complete"
        );

        let diagnostics = SearchDiagnostics {
            evaluated_moves: stats.evaluated_moves,
            search_depth: self.depth,
            duration,
            nodes_expanded: stats.nodes_expanded,
            search_tree: root_node,
            principal_variation,
        };
        (best, diagnostics)
    }

    /// One level of the recursion. Returns the backed-up score, the best
    /// move at this node, and the diagnostic node when capture is on.
    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &self,
        state: &S,
        depth_left: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        move_from_parent: Option<S::Move>,
        root_player: Player,
        stats: &mut SearchStats<S::Move>,
    ) -> (i32, Option<S::Move>, Option<SearchNode<S::Move>>) {
        stats.nodes_expanded += 1;
        let depth_from_root = self.depth - depth_left;

        let (over, _) = state.game_over();
        if depth_left == 0 || over {
            let score = self.evaluator.evaluate(state, root_player);
            let node = self.capture_tree.then(|| SearchNode {
                mv: move_from_parent,
                score,
                depth_from_root,
                maximizing,
                children: Vec::new(),
            });
            return (score, None, node);
        }

        let mover = if maximizing { root_player } else { root_player.opponent() };
        let moves = state.valid_moves(mover);

        let mut node = self.capture_tree.then(|| SearchNode {
            mv: move_from_parent,
            score: 0,
            depth_from_root,
            maximizing,
            children: Vec::with_capacity(moves.len()),
        });

        let mut value = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;

        for mv in moves {
            let mut child_state = state.clone();
            // Moves straight out of valid_moves cannot be rejected.
            let _ = child_state.drop_piece(&mv, mover);

            let (score, _, child_node) = self.minimax(
                &child_state,
                depth_left - 1,
                !maximizing,
                alpha,
                beta,
                Some(mv.clone()),
                root_player,
                stats,
            );

            if let (Some(parent), Some(child)) = (node.as_mut(), child_node) {
                parent.children.push(child);
            }
            if depth_left == self.depth {
                stats.evaluated_moves.push(MoveEvaluation { mv: mv.clone(), score });
            }

            if maximizing {
                if score > value {
                    value = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(value);
            } else {
                if score < value {
                    value = score;
                    best_move = Some(mv);
                }
                beta = beta.min(value);
            }

            if alpha >= beta {
                break;
            }
        }

        if let Some(parent) = node.as_mut() {
            parent.score = value;
        }
        (value, best_move, node)
    }
}

/// A baseline opponent that picks uniformly among the legal moves.
/// Seeded so that match series reproduce run to run.
pub struct RandomAgent {
    rng: Xoshiro256PlusPlus,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Picks one of `player`'s legal moves, `None` when there is none.
    pub fn choose_move<S: GameState>(&mut self, state: &S, player: Player) -> Option<S::Move> {
        let mut moves = state.valid_moves(player);
        if moves.is_empty() {
            return None;
        }
        let idx = (self.rng.next_u64() % moves.len() as u64) as usize;
        Some(moves.swap_remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::span;

    use super::*;
    use crate::games::tictactoe::{TicTacToeEvaluator, TicTacToeState};

    fn leaf(mv: u32, score: i32, maximizing: bool) -> SearchNode<u32> {
        SearchNode {
            mv: Some(mv),
            score,
            depth_from_root: 1,
            maximizing,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_player_opponent_and_token() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent(), Player::One);
        assert_eq!(Player::One.token(), 1);
        assert_eq!(Player::Two.token(), 2);
    }

    #[test]
    fn test_principal_variation_follows_extremal_child() {
        let root = SearchNode {
            mv: None,
            score: 7,
            depth_from_root: 0,
            maximizing: true,
            children: vec![leaf(0, 3, false), leaf(1, 7, false), leaf(2, 5, false)],
        };
        assert_eq!(root.principal_variation(), vec![1]);
    }

    #[test]
    fn test_principal_variation_breaks_ties_toward_first_child() {
        let root = SearchNode {
            mv: None,
            score: 4,
            depth_from_root: 0,
            maximizing: true,
            children: vec![leaf(0, 4, false), leaf(1, 4, false)],
        };
        assert_eq!(root.principal_variation(), vec![0]);
    }

    #[test]
    fn test_principal_variation_alternates_min_and_max() {
        let mut reply_good = leaf(10, 2, true);
        reply_good.depth_from_root = 2;
        let mut reply_bad = leaf(11, 9, true);
        reply_bad.depth_from_root = 2;
        let mid = SearchNode {
            mv: Some(1),
            score: 2,
            depth_from_root: 1,
            maximizing: false,
            children: vec![reply_bad, reply_good],
        };
        let root = SearchNode {
            mv: None,
            score: 2,
            depth_from_root: 0,
            maximizing: true,
            children: vec![leaf(0, 1, false), mid],
        };
        // Max picks the score-2 child, min inside it picks the score-2 reply.
        assert_eq!(root.principal_variation(), vec![1, 10]);
    }

    #[test]
    fn test_principal_variation_stops_at_moveless_child() {
        let mut anonymous = leaf(0, 5, false);
        anonymous.mv = None;
        let root = SearchNode {
            mv: None,
            score: 5,
            depth_from_root: 0,
            maximizing: true,
            children: vec![anonymous],
        };
        assert!(root.principal_variation().is_empty());
    }

    #[test]
    fn test_principal_variation_of_leaf_is_empty() {
        let node = leaf(3, 0, true);
        assert!(node.principal_variation().is_empty());
    }

    /// Collects every `(field, value)` pair of every event it sees.
    struct EventFieldLogger {
        fields: Arc<Mutex<Vec<(String, String)>>>,
    }

    struct FieldWriter<'a>(&'a mut Vec<(String, String)>);

    impl Visit for FieldWriter<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{value:?}")));
        }
    }

    impl tracing::Subscriber for EventFieldLogger {
        fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
            span::Id::from_u64(1)
        }

        fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

        fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

        fn event(&self, event: &tracing::Event<'_>) {
            let mut fields = self.fields.lock().unwrap();
            event.record(&mut FieldWriter(&mut fields));
        }

        fn enter(&self, _: &span::Id) {}

        fn exit(&self, _: &span::Id) {}
    }

    #[test]
    fn test_search_completion_event_carries_the_chosen_move() {
        let fields = Arc::new(Mutex::new(Vec::new()));
        let subscriber = EventFieldLogger { fields: Arc::clone(&fields) };

        let game = TicTacToeState::new();
        let engine = Minimax::new(2, Box::new(TicTacToeEvaluator));
        let (mv, diag) = tracing::subscriber::with_default(subscriber, || {
            engine.choose_move(&game, Player::One)
        });

        let recorded = fields.lock().unwrap();
        let field = |name: &str| {
            recorded
                .iter()
                .find(|(recorded_name, _)| recorded_name == name)
                .map(|(_, value)| value.clone())
        };
        assert_eq!(field("best_move"), Some(format!("{mv:?}")));
        assert_eq!(field("search_depth"), Some("2".to_string()));
        assert_eq!(field("nodes_expanded"), Some(diag.nodes_expanded.to_string()));
        assert!(field("best_score").is_some());
        assert!(field("duration_ms").is_some());
    }
}
