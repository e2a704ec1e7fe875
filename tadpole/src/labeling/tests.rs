//! Tests for connected component labeling.

#![allow(clippy::identity_op, clippy::erasing_op)]

use super::*;

fn mask_from_rows(rows: &[&str]) -> Mask {
    let height = rows.len();
    let width = rows[0].len();
    let data: Vec<bool> = rows
        .iter()
        .flat_map(|r| r.chars().map(|c| c == '#'))
        .collect();
    Mask::new(width, height, data)
}

#[test]
fn empty_mask() {
    let mask = Mask::new_filled(4, 4, false);
    let label_map = label_components(&mask, Connectivity::Eight);

    assert_eq!(label_map.num_labels(), 0);
    assert!(label_map.labels().iter().all(|&l| l == 0));
}

#[test]
fn single_pixel() {
    let mut mask = Mask::new_filled(4, 4, false);
    mask[(1, 1)] = true;

    let label_map = label_components(&mask, Connectivity::Four);

    assert_eq!(label_map.num_labels(), 1);
    assert_eq!(label_map[1 * 4 + 1], 1);
    assert_eq!(label_map.labels().iter().filter(|&&l| l == 1).count(), 1);
}

#[test]
fn diagonal_pixels_depend_on_connectivity() {
    let mask = mask_from_rows(&[
        "#...", //
        ".#..", //
        "..#.", //
    ]);

    let four = label_components(&mask, Connectivity::Four);
    assert_eq!(four.num_labels(), 3);

    let eight = label_components(&mask, Connectivity::Eight);
    assert_eq!(eight.num_labels(), 1);
    assert_eq!(eight[(0, 0)], eight[(2, 2)]);
}

#[test]
fn u_shape_merges_into_one_label() {
    // Two vertical arms join only at the bottom row, forcing a union.
    let mask = mask_from_rows(&[
        "#...#", //
        "#...#", //
        "#####", //
    ]);

    let label_map = label_components(&mask, Connectivity::Four);

    assert_eq!(label_map.num_labels(), 1);
    assert_eq!(label_map[(0, 0)], 1);
    assert_eq!(label_map[(4, 0)], 1);
}

#[test]
fn labels_follow_raster_order() {
    let mask = mask_from_rows(&[
        "...##", //
        "#....", //
        "#..#.", //
    ]);

    let label_map = label_components(&mask, Connectivity::Four);

    assert_eq!(label_map.num_labels(), 3);
    assert_eq!(label_map[(3, 0)], 1);
    assert_eq!(label_map[(0, 1)], 2);
    assert_eq!(label_map[(3, 2)], 3);
}

#[test]
fn areas_and_distinct_labels() {
    let mask = mask_from_rows(&[
        "##..#", //
        "##...", //
        ".....", //
    ]);
    let label_map = label_components(&mask, Connectivity::Eight);

    assert_eq!(label_map.distinct_labels(), vec![1, 2]);
    assert_eq!(label_map.areas(), vec![10, 4, 1]);
    assert_eq!(label_map.max_label(), 2);
}

#[test]
fn footprint_and_remap() {
    let labels = LabelMap::new(Buffer2::new(4, 1, vec![0, 3, 3, 7]));
    assert_eq!(labels.footprint(3).pixels(), &[false, true, true, false]);

    let mut table = vec![0u32; 8];
    table[3] = 1;
    table[7] = 2;
    let remapped = labels.remap(&table);
    assert_eq!(remapped.labels(), &[0, 1, 1, 2]);
}

#[test]
fn remove_small_objects_keeps_large_components() {
    let mask = mask_from_rows(&[
        "###...#", //
        "###....", //
        "###..#.", //
    ]);

    let cleaned = remove_small_objects(&mask, 3, Connectivity::Four);

    assert_eq!(cleaned.count_ones(), 9);
    assert!(!cleaned[(6, 0)]);
    assert!(!cleaned[(5, 2)]);
}

#[test]
fn remove_small_objects_connectivity_matters() {
    // A diagonal line of 5 pixels: one object under 8-connectivity,
    // five single pixels under 4-connectivity.
    let mask = mask_from_rows(&[
        "#....", //
        ".#...", //
        "..#..", //
        "...#.", //
        "....#", //
    ]);

    assert_eq!(
        remove_small_objects(&mask, 5, Connectivity::Eight).count_ones(),
        5
    );
    assert_eq!(
        remove_small_objects(&mask, 5, Connectivity::Four).count_ones(),
        0
    );
}

#[test]
fn remove_small_objects_noop_below_two() {
    let mask = mask_from_rows(&["#.#"]);
    assert_eq!(remove_small_objects(&mask, 1, Connectivity::Four), mask);
}
