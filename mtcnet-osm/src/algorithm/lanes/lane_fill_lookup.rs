use crate::model::feature::Highway;
use kdam::tqdm;
use std::collections::HashMap;

/// looks up the most common tagged lane count by highway class in order to
/// fill links whose OSM ways carry no lane tags.
pub struct LaneFillLookup {
    pub lanes_by_class: HashMap<Highway, u32>,
}

impl LaneFillLookup {
    /// builds the lookup from (class, tagged lane count) observations. ties
    /// between equally common counts go to the smaller count.
    pub fn new(observations: impl ExactSizeIterator<Item = (Highway, Option<u32>)>) -> LaneFillLookup {
        let total = observations.len();
        let mut buckets: HashMap<Highway, HashMap<u32, usize>> = HashMap::new();
        let obs_iter = tqdm!(observations, desc = "collect lane fill values", total = total);
        for (highway, lanes_opt) in obs_iter {
            if let Some(lanes) = lanes_opt {
                *buckets.entry(highway).or_default().entry(lanes).or_insert(0) += 1;
            }
        }
        eprintln!();

        let lanes_by_class = buckets
            .into_iter()
            .filter_map(|(highway, counts)| {
                counts
                    .into_iter()
                    .max_by(|(l_a, c_a), (l_b, c_b)| c_a.cmp(c_b).then(l_b.cmp(l_a)))
                    .map(|(lanes, _)| (highway, lanes))
            })
            .collect::<HashMap<_, _>>();
        LaneFillLookup { lanes_by_class }
    }

    /// the fill value for a class, if that class had any tagged links.
    pub fn get(&self, highway: &Highway) -> Option<u32> {
        self.lanes_by_class.get(highway).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::LaneFillLookup;
    use crate::model::feature::Highway;

    #[test]
    fn test_mode_with_tie_to_smallest() {
        let obs = vec![
            (Highway::Primary, Some(2)),
            (Highway::Primary, Some(3)),
            (Highway::Primary, Some(3)),
            (Highway::Primary, None),
            (Highway::Residential, Some(2)),
            (Highway::Residential, Some(1)),
        ];
        let lookup = LaneFillLookup::new(obs.into_iter());
        assert_eq!(lookup.get(&Highway::Primary), Some(3));
        assert_eq!(lookup.get(&Highway::Residential), Some(1));
        assert_eq!(lookup.get(&Highway::Trunk), None);
    }
}
