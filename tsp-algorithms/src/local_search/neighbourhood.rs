use super::config::Move;
use tsp_challenges::route::Route;

/// Position pairs `(i, j)` with `i < j`, in sweep order.
pub fn pairs(num_steps: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..num_steps).flat_map(move |i| (i + 1..num_steps).map(move |j| (i, j)))
}

pub fn apply(route: &Route, mv: Move, i: usize, j: usize) -> Route {
    match mv {
        Move::Swap => route.swapped(i, j),
        Move::Reverse => route.reversed(i, j),
    }
}

/// Every route one `mv` away from `route`, n·(n-1)/2 of them.
pub fn neighbours(route: &Route, mv: Move) -> impl Iterator<Item = Route> + '_ {
    pairs(route.step_count()).map(move |(i, j)| apply(route, mv, i, j))
}
