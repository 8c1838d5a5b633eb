//! Property tests over random tracks: the invariants every representation
//! has to keep regardless of the input.

use chrono::{TimeDelta, TimeZone, Utc};
use geochron::{
    chronnet_create, convert_geosynchnet, convert_geotimehash, convert_timehex, generate_boundaries,
    hash_intervals, partition, ChronnetConfig, Coordinate, GeoShape, GridHasher, SlicingConfig,
    Timestamp, Track,
};
use proptest::prelude::*;

fn base() -> Timestamp {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

fn arb_track() -> impl Strategy<Value = Track> {
    prop::collection::vec((0i64..24 * 60, -0.2f64..0.0, 51.4f64..51.6), 1..40).prop_map(|points| {
        points
            .into_iter()
            .map(|(minute, lon, lat)| {
                GeoShape::point(Coordinate::new(lon, lat), base() + TimeDelta::minutes(minute))
            })
            .collect::<Track>()
    })
}

fn arb_period() -> impl Strategy<Value = TimeDelta> {
    (1i64..240).prop_map(TimeDelta::minutes)
}

fn hasher() -> GridHasher {
    GridHasher::new(14).unwrap()
}

proptest! {
    #[test]
    fn boundaries_increase_and_cover_end(track in arb_track(), period in arb_period()) {
        let (start, end) = (track.start().unwrap(), track.end().unwrap());
        let boundaries = generate_boundaries(start, end, period).unwrap();

        prop_assert!(!boundaries.is_empty());
        prop_assert!(boundaries[0] > start);
        prop_assert!(boundaries.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(*boundaries.last().unwrap() > end);
    }

    #[test]
    fn partition_keeps_every_shape(track in arb_track(), period in arb_period()) {
        let boundaries = generate_boundaries(track.start().unwrap(), track.end().unwrap(), period).unwrap();
        let parts = partition(&track, &boundaries);

        prop_assert_eq!(parts.len(), boundaries.len());
        let rebuilt: Vec<GeoShape> = parts.iter().flat_map(|p| p.iter().cloned()).collect();
        prop_assert_eq!(rebuilt.as_slice(), track.shapes());
    }

    #[test]
    fn timehex_counts_every_shape(track in arb_track(), period in arb_period()) {
        let table = convert_timehex(&track, period, &hasher()).unwrap();
        let total: u64 = table.rows().iter().flat_map(|r| r.counts.values()).sum();
        prop_assert_eq!(total, track.len() as u64);
    }

    #[test]
    fn chronnet_weight_is_product_of_populated_neighbours(track in arb_track(), period in arb_period()) {
        let hashed = hash_intervals(&track, period, &hasher(), &SlicingConfig::default()).unwrap();
        let net = chronnet_create(&hashed, &ChronnetConfig::default());

        let populated: Vec<u64> = hashed
            .iter()
            .map(|h| h.occurrences())
            .filter(|n| *n > 0)
            .collect();
        let expected: u64 = populated.windows(2).map(|w| w[0] * w[1]).sum();
        prop_assert_eq!(net.total_weight(), expected);
    }

    #[test]
    fn geosynchnet_is_symmetric_without_loops(track in arb_track(), period in arb_period()) {
        let net = convert_geosynchnet(&track, period, &hasher()).unwrap();
        prop_assert!(net.self_loops().is_empty());
        for ((a, b), w) in net.edges() {
            prop_assert_eq!(net.weight(b, a), Some(w));
        }
    }

    #[test]
    fn geotimehash_buckets_sum_to_one(track in arb_track(), precision in 5u8..=9) {
        let map = convert_geotimehash(&track, precision, &hasher()).unwrap();
        for timehash in map.timehashes() {
            let sum: f64 = map.iter().filter(|(k, _)| k.timehash == timehash).map(|(_, w)| w).sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "bucket {} sums to {}", timehash, sum);
        }
    }

    #[test]
    fn conversions_are_deterministic(track in arb_track(), period in arb_period()) {
        let config = ChronnetConfig::default();
        let first = hash_intervals(&track, period, &hasher(), &SlicingConfig::default()).unwrap();
        let second = hash_intervals(&track, period, &hasher(), &SlicingConfig::default()).unwrap();
        prop_assert_eq!(chronnet_create(&first, &config), chronnet_create(&second, &config));
    }
}
