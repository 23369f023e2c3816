//! The search proper: iterative deepening over a fail-soft PVS with a
//! capture-only quiescence search at the leaves.

use super::control::{BestSoFar, SearchControl};
use super::killer::KillerTable;
use super::ordering::{order_captures, order_moves};
use super::{
    pv_to_string, InfoCallback, PrincipalVariation, SearchInfo, SearchLimits, SearchResult, MAX_DEPTH,
    TERMINAL_DEPTH,
};
use crate::eval::{Evaluator, StaticEvaluator};
use crate::position::Position;
use crate::tt::TranspositionTable;
use crate::types::value::{CHECKMATE_THRESHOLD, DRAW, INFINITY, MATE_PLY_PENALTY};
use crate::types::{Bound, CompactMove, Move};
use std::sync::Arc;

/// The search was stopped through its [`SearchControl`]
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("search interrupted")]
pub struct Interrupted;

pub struct Searcher<E: Evaluator = StaticEvaluator> {
    pos: Position,
    root_hash: u64,
    tt: Arc<TranspositionTable>,
    evaluator: E,
    limits: SearchLimits,
    control: Arc<SearchControl>,
    killers: KillerTable,
    info_callback: Option<InfoCallback>,
    ply: u32,
    seldepth: u32,
    nodes: u64,
    evals: u64,
}

impl Searcher<StaticEvaluator> {
    pub fn new(pos: &Position, tt: Arc<TranspositionTable>, limits: SearchLimits) -> Self {
        Self::with_evaluator(pos, tt, limits, StaticEvaluator)
    }
}

impl<E: Evaluator> Searcher<E> {
    /// Prepare a search of `pos`
    ///
    /// The position is copied. Until the first iteration completes, the
    /// best move on record is the table's move for the root (if any) and
    /// the score is the static evaluation.
    pub fn with_evaluator(pos: &Position, tt: Arc<TranspositionTable>, limits: SearchLimits, evaluator: E) -> Self {
        let control = Arc::new(SearchControl::new(limits.search_time, limits.ponder));
        let root_hash = pos.hash();
        control.commit(BestSoFar {
            best_move: tt.best_move(root_hash),
            score: evaluator.evaluate(pos),
            depth: 0,
        });
        Self {
            pos: pos.clone(),
            root_hash,
            tt,
            evaluator,
            limits,
            control,
            killers: KillerTable::new(),
            info_callback: None,
            ply: 0,
            seldepth: 0,
            nodes: 0,
            evals: 0,
        }
    }

    /// Receive a [`SearchInfo`] after every completed iteration
    pub fn with_info_callback(mut self, callback: InfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }

    /// Handle for stopping and steering the search from other threads
    pub fn control(&self) -> Arc<SearchControl> {
        Arc::clone(&self.control)
    }

    pub fn root(&self) -> &Position {
        &self.pos
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn evals(&self) -> u64 {
        self.evals
    }

    /// Iterative deepening from depth 1
    ///
    /// Stops after the iteration that finds a mate, when the time budget
    /// says another iteration will not fit, at the depth limit, or as soon
    /// as the control's stop flag is seen. Only completed iterations
    /// update the result.
    pub fn run(&mut self) -> SearchResult {
        let initial = self.control.best();
        let mut result = SearchResult {
            best_move: (!initial.best_move.is_none()).then_some(initial.best_move),
            score: initial.score,
            depth: 0,
            nodes: 0,
            pv: PrincipalVariation::new(),
            completed: false,
        };
        let max_depth = self.limits.max_depth.clamp(1, MAX_DEPTH);

        let mut depth = 1;
        loop {
            let mut pv = PrincipalVariation::new();
            let score = match self.search(-INFINITY, INFINITY, depth as i32, &mut pv) {
                Ok(score) => score,
                Err(Interrupted) => {
                    log::debug!("Search interrupted at depth {} after {} nodes", depth, self.nodes);
                    result.nodes = self.nodes;
                    self.control.mark_finished();
                    return result;
                }
            };
            self.control.record_iteration();

            let best_move = match pv.first() {
                Some(&mv) => mv,
                None => {
                    let fallback = self.tt.best_move(self.root_hash);
                    if fallback.is_none() && !self.pos.generate_moves().is_empty() {
                        log::error!(
                            "Iteration {} completed without a best move [{}]",
                            depth,
                            self.pos.to_fen()
                        );
                    }
                    fallback
                }
            };
            self.control.commit(BestSoFar {
                best_move,
                score,
                depth,
            });
            result.best_move = (!best_move.is_none()).then_some(best_move);
            result.score = score;
            result.depth = depth;
            result.nodes = self.nodes;

            if self.seldepth > 0 {
                self.report(depth, score, &pv);
            }
            result.pv = pv;

            // A forced mate will not change with more depth
            if score.abs() > CHECKMATE_THRESHOLD {
                break;
            }
            if !self.control.can_search_deeper() {
                break;
            }
            depth += 1;
            if depth > max_depth {
                break;
            }
        }

        result.completed = true;
        self.control.mark_finished();
        result
    }

    fn report(&self, depth: u32, score: i32, pv: &[CompactMove]) {
        let info = SearchInfo {
            depth,
            seldepth: self.seldepth,
            score,
            elapsed: self.control.last_iteration(),
            nodes: self.nodes,
            evals: self.evals,
            hashfull: self.tt.hashfull(),
            pv: pv_to_string(pv),
        };
        log::trace!(
            "depth {} seldepth {} score {} nodes {} hashfull {} pv {}",
            info.depth,
            info.seldepth,
            info.score,
            info.nodes,
            info.hashfull,
            info.pv
        );
        if let Some(callback) = &self.info_callback {
            callback(&info);
        }
    }

    #[inline]
    fn check_stop(&self) -> Result<(), Interrupted> {
        if self.control.is_stopped() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }

    fn search(&mut self, mut alpha: i32, beta: i32, depth: i32, pv: &mut PrincipalVariation) -> Result<i32, Interrupted> {
        self.check_stop()?;
        self.nodes += 1;
        self.seldepth = self.seldepth.max(self.ply);

        let hash = self.pos.hash();
        let mut hash_move = CompactMove::NONE;
        if let Some(entry) = self.tt.probe(hash) {
            hash_move = entry.best_move;
            if entry.is_usable(depth, alpha, beta) {
                pv.clear();
                if !hash_move.is_none() {
                    pv.push(hash_move);
                }
                return Ok(entry.score);
            }
        }

        if depth <= 0 {
            let score = self.quiescence(alpha, beta)?;
            self.tt.store(hash, depth, score, Bound::Exact, hash_move);
            return Ok(score);
        }

        let mut moves = self.pos.generate_moves();
        if moves.is_empty() {
            let score = if self.pos.is_in_check(self.pos.side_to_move()) {
                -INFINITY
            } else {
                DRAW
            };
            self.tt.store(hash, TERMINAL_DEPTH, score, Bound::Exact, hash_move);
            return Ok(score);
        }

        let ply = self.ply as usize;
        order_moves(&mut moves, hash_move, &self.killers.get(ply));

        let mut bound = Bound::Upper;
        let mut best_score = -INFINITY;
        let mut best_move = hash_move;
        let mut child_pv = PrincipalVariation::new();

        for (i, mv) in moves.iter().enumerate() {
            child_pv.clear();
            let mut score = self.search_child(mv, alpha, beta, depth, i == 0, &mut child_pv)?;
            if score > CHECKMATE_THRESHOLD {
                score -= MATE_PLY_PENALTY;
            }

            if score >= beta {
                if !mv.is_capture() && !mv.is_promotion() {
                    self.killers.update(ply, mv.compact());
                }
                self.tt.store(hash, depth, score, Bound::Lower, mv.compact());
                return Ok(score);
            }

            if score > best_score {
                best_score = score;
                best_move = mv.compact();
                if score > alpha {
                    alpha = score;
                    bound = Bound::Exact;
                    pv.clear();
                    pv.push(best_move);
                    pv.extend_from_slice(&child_pv);
                }
            }
        }

        self.tt.store(hash, depth, best_score, bound, best_move);
        Ok(best_score)
    }

    /// Play `mv`, search the reply and take it back, even when interrupted
    fn search_child(
        &mut self,
        mv: &Move,
        alpha: i32,
        beta: i32,
        depth: i32,
        full_window: bool,
        pv: &mut PrincipalVariation,
    ) -> Result<i32, Interrupted> {
        self.pos.do_move(mv);
        self.ply += 1;
        let result = self.pvs(alpha, beta, depth - 1, full_window, pv);
        self.ply -= 1;
        self.pos.undo_move(mv);
        result
    }

    fn pvs(&mut self, alpha: i32, beta: i32, depth: i32, full_window: bool, pv: &mut PrincipalVariation) -> Result<i32, Interrupted> {
        if full_window {
            return Ok(-self.search(-beta, -alpha, depth, pv)?);
        }
        let score = -self.search(-alpha - 1, -alpha, depth, pv)?;
        if score > alpha && score < beta {
            pv.clear();
            return Ok(-self.search(-beta, -alpha, depth, pv)?);
        }
        Ok(score)
    }

    fn quiescence(&mut self, mut alpha: i32, beta: i32) -> Result<i32, Interrupted> {
        self.check_stop()?;
        self.nodes += 1;
        self.evals += 1;
        self.seldepth = self.seldepth.max(self.ply);

        let stand_pat = self.evaluator.evaluate(&self.pos);
        if stand_pat >= beta {
            return Ok(stand_pat);
        }
        alpha = alpha.max(stand_pat);

        let mut best = stand_pat;
        let mut captures = self.pos.generate_captures();
        order_captures(&mut captures);
        for mv in captures.iter() {
            self.pos.do_move(mv);
            self.ply += 1;
            let result = self.quiescence(-beta, -alpha);
            self.ply -= 1;
            self.pos.undo_move(mv);

            let score = -result?;
            if score >= beta {
                return Ok(score);
            }
            if score > best {
                best = score;
                alpha = alpha.max(score);
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluate;
    use crate::types::value::is_mate_score;
    use std::sync::Mutex;
    use std::time::Duration;

    fn table() -> Arc<TranspositionTable> {
        Arc::new(TranspositionTable::new(1 << 16))
    }

    fn searcher(fen: &str, limits: SearchLimits) -> Searcher {
        Searcher::new(&Position::from_fen(fen).unwrap(), table(), limits)
    }

    #[test]
    fn test_quiescence_without_captures_is_static_eval() {
        let fen = "4k3/8/8/8/8/8/4P3/4K3 w - -";
        let mut s = searcher(fen, SearchLimits::depth(1));
        let expected = evaluate(&Position::from_fen(fen).unwrap());
        assert_eq!(s.quiescence(-INFINITY, INFINITY), Ok(expected));
        assert_eq!(s.evals(), 1);
    }

    #[test]
    fn test_quiescence_takes_hanging_queen() {
        let fen = "4k3/8/8/3q4/4P3/8/8/4K3 w - -";
        let mut s = searcher(fen, SearchLimits::depth(1));
        let stand_pat = evaluate(&Position::from_fen(fen).unwrap());
        let score = s.quiescence(-INFINITY, INFINITY).unwrap();
        assert!(score > stand_pat + 800);
    }

    #[test]
    fn test_quiescence_stand_pat_cutoff() {
        let fen = "4k3/8/8/3q4/4P3/8/8/4K3 w - -";
        let mut s = searcher(fen, SearchLimits::depth(1));
        let stand_pat = evaluate(&Position::from_fen(fen).unwrap());
        // Beta at or below the static score returns without searching
        assert_eq!(s.quiescence(stand_pat - 50, stand_pat), Ok(stand_pat));
        assert_eq!(s.nodes(), 1);
    }

    #[test]
    fn test_finds_mate_in_one() {
        // Back-rank mate with Ra8
        let mut s = searcher("6k1/5ppp/8/8/8/8/8/R5K1 w - -", SearchLimits::depth(4));
        let result = s.run();
        assert!(result.completed);
        assert_eq!(result.best_move.and_then(|m| m.notation()).as_deref(), Some("a1a8"));
        assert!(result.score > CHECKMATE_THRESHOLD);
        // Mate ends the deepening early
        assert!(result.depth < 4);
    }

    #[test]
    fn test_mate_score_loses_a_step_per_ply() {
        let mut s = searcher("6k1/5ppp/8/8/8/8/8/R5K1 w - -", SearchLimits::depth(2));
        let score = s.run().score;
        assert_eq!(score, INFINITY - MATE_PLY_PENALTY);
        assert!(is_mate_score(score));
    }

    #[test]
    fn test_checkmated_root_has_no_move() {
        // Fool's mate, white to move and mated
        let mut s = searcher(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq -",
            SearchLimits::depth(3),
        );
        let result = s.run();
        assert_eq!(result.score, -INFINITY);
        assert_eq!(result.best_move, None);
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn test_stalemate_scores_draw() {
        let mut s = searcher("7k/5Q2/6K1/8/8/8/8/8 b - -", SearchLimits::depth(2));
        let result = s.run();
        assert_eq!(result.score, DRAW);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn test_pv_starts_with_best_move_and_is_legal() {
        let mut s = searcher(
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq -",
            SearchLimits::depth(3),
        );
        let result = s.run();
        assert_eq!(result.pv.first().copied(), result.best_move);

        let mut pos = s.root().clone();
        for mv in &result.pv {
            let notation = mv.notation().unwrap();
            let legal = pos.find_move(&notation).expect("pv move must be legal");
            pos.do_move(&legal);
        }
    }

    #[test]
    fn test_info_reported_per_iteration() {
        let infos = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&infos);
        let mut s = Searcher::new(&Position::startpos(), table(), SearchLimits::depth(3))
            .with_info_callback(Box::new(move |info| sink.lock().unwrap().push(info.clone())));
        let result = s.run();

        let infos = infos.lock().unwrap();
        assert_eq!(infos.len(), 3);
        assert_eq!(infos.iter().map(|i| i.depth).collect::<Vec<_>>(), [1, 2, 3]);
        let last = infos.last().unwrap();
        assert_eq!(last.score, result.score);
        assert_eq!(last.nodes, result.nodes);
        assert!(last.seldepth >= 3);
        assert!(last.evals > 0);
        assert!(last.hashfull > 0 && last.hashfull <= 1000);
        assert!(infos.windows(2).all(|w| w[0].hashfull <= w[1].hashfull));
        assert_eq!(last.pv.split(' ').count(), result.pv.len());
    }

    #[test]
    fn test_stop_before_first_iteration_keeps_initial_guess() {
        let tt = table();
        let pos = Position::startpos();
        let hint = pos.clone().find_move("d2d4").unwrap().compact();
        tt.store(pos.hash(), 0, 0, Bound::Exact, hint);

        let mut s = Searcher::new(&pos, tt, SearchLimits::default());
        s.control().stop();
        let result = s.run();
        assert!(!result.completed);
        assert_eq!(result.depth, 0);
        assert_eq!(result.best_move, Some(hint));
        assert_eq!(result.score, evaluate(&pos));
        assert!(s.control().is_finished());
        // The root position is restored
        assert_eq!(s.root(), &pos);
    }

    #[test]
    fn test_stop_from_another_thread() {
        let mut s = Searcher::new(&Position::startpos(), table(), SearchLimits::default());
        let control = s.control();
        let handle = std::thread::spawn(move || s.run());
        std::thread::sleep(Duration::from_millis(200));
        control.stop();
        let result = handle.join().unwrap();
        assert!(!result.completed);
        assert!(result.depth >= 1);
        assert_eq!(control.best().depth, result.depth);
        assert_eq!(Some(control.best().best_move), result.best_move);
    }

    #[test]
    fn test_time_budget_ends_deepening() {
        let mut s = searcher(
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq -",
            SearchLimits::time(Duration::ZERO),
        );
        let result = s.run();
        assert!(result.completed);
        assert!(result.best_move.is_some());
        // Depth 1 always runs; deeper iterations only while under a millisecond
        assert!(result.depth >= 1 && result.depth < 5);
    }

    #[test]
    fn test_shared_table_feeds_next_search() {
        let tt = table();
        let pos = Position::startpos();
        let first = Searcher::new(&pos, Arc::clone(&tt), SearchLimits::depth(3)).run();
        assert_eq!(tt.best_move(pos.hash()), first.best_move.unwrap());

        let second = Searcher::new(&pos, tt, SearchLimits::depth(3)).run();
        assert!(second.nodes < first.nodes);
    }
}
