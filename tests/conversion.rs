use approx::assert_relative_eq;
use cmeode::cell::units::{
    reference_volume, volume_from_surface_area, VOLUME_CEILING, VOLUME_CEILING_RECORD,
};
use cmeode::data::{CELL_SA, CELL_VOLUME};
use cmeode::prelude::*;

fn surface_areas() -> Vec<u64> {
    vec![1_000, 50_000, 250_000, 502_655, 700_000, 797_000, 798_500, 1_200_000]
}

#[test]
fn particle_round_trip_is_exact_within_rounding() {
    for sa in surface_areas() {
        let mut pmap = ParticleMap::from([(CELL_SA, sa)]);
        for particles in [0u64, 1, 2, 17, 999, 20_181, 1_000_003, 987_654_321] {
            let mm = particles_to_mm(particles, &mut pmap).unwrap();
            let back = mm_to_particles(mm, &mut pmap);
            assert_eq!(back, particles, "sa = {sa}, particles = {particles}");
        }
    }
}

#[test]
fn concentration_round_trip_is_within_one_particle() {
    let mut pmap = ParticleMap::from([(CELL_SA, 502_655)]);
    let per_particle = particles_to_mm(1, &mut pmap).unwrap();
    for mm in [0.0, 1e-5, 0.0123, 0.5, 3.0, 42.0] {
        let particles = mm_to_particles(mm, &mut pmap);
        let back = particles_to_mm(particles, &mut pmap).unwrap();
        assert!((back - mm).abs() <= per_particle / 2.0 + 1e-12, "mm = {mm}");
    }
}

#[test]
fn volume_is_clamped_once_the_cell_has_doubled() {
    let mut previous = 0.0;
    for sa in surface_areas() {
        let mut pmap = ParticleMap::from([(CELL_SA, sa)]);
        let volume = cell_volume(&mut pmap);
        let unclamped = volume_from_surface_area(sa as f64);

        assert!(volume <= VOLUME_CEILING);
        assert!(volume >= previous, "volume must not shrink with area");
        if unclamped >= VOLUME_CEILING {
            assert_eq!(volume, VOLUME_CEILING);
            assert_eq!(pmap.count(CELL_VOLUME), VOLUME_CEILING_RECORD);
        } else {
            assert_relative_eq!(volume, unclamped);
            assert_eq!(pmap.count(CELL_VOLUME), (unclamped * 1e19).round_ties_even() as u64);
        }
        previous = volume;
    }
}

#[test]
fn reference_cell_area_gives_the_reference_volume() {
    let mut pmap = ParticleMap::from([(CELL_SA, 502_655)]);
    assert_relative_eq!(cell_volume(&mut pmap), reference_volume(), max_relative = 1e-5);
}
