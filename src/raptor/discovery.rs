use std::collections::HashMap;

use bitvec::prelude::*;

use crate::timetable::entities::{RouteIdx, StopIdx};
use crate::timetable::Timetable;

/// Builds `Q`, the mapping from each route touched by a marked stop to the
/// earliest (lowest-position) boarding stop on that route — the
/// "accumulate routes" step shared by RAPTOR and McRAPTOR.
pub fn accumulate_routes(timetable: &Timetable, marked: &BitSlice) -> Vec<(RouteIdx, StopIdx)> {
    let mut boarding_stop: HashMap<RouteIdx, StopIdx> = HashMap::new();

    for stop in marked.iter_ones() {
        let stop = stop as StopIdx;
        for &route in timetable.routes_of_stop(stop) {
            match boarding_stop.get(&route) {
                None => {
                    boarding_stop.insert(route, stop);
                }
                Some(&current) => {
                    let current_pos = timetable.position_in_route(route, current).unwrap();
                    let candidate_pos = timetable.position_in_route(route, stop).unwrap();
                    if candidate_pos < current_pos {
                        boarding_stop.insert(route, stop);
                    }
                }
            }
        }
    }

    boarding_stop.into_iter().collect()
}
