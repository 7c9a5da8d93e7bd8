use std::rc::Rc;

use gpu_chart::core::{Size, Viewport};
use gpu_chart::layout::{
    ContentMeasure, Direction, LayoutArea, LayoutCache, LayoutContext, LayoutKey, LayoutNode,
    LinearLayout,
};
use proptest::prelude::*;

fn area_strategy() -> impl Strategy<Value = LayoutArea> {
    (-2.0f64..2.0, -2.0f64..2.0, 0.0f64..3.0, 0.0f64..3.0)
        .prop_map(|(left, top, width, height)| LayoutArea::new(left, top, width, height))
}

fn assert_areas_close(a: LayoutArea, b: LayoutArea) -> Result<(), TestCaseError> {
    prop_assert_eq!(a.left, b.left);
    prop_assert_eq!(a.top, b.top);
    prop_assert!((a.width - b.width).abs() <= 1e-9);
    prop_assert!((a.height - b.height).abs() <= 1e-9);
    Ok(())
}

proptest! {
    #[test]
    fn linear_children_partition_the_container(
        vertical in any::<bool>(),
        fixed_px in proptest::collection::vec(0.0f64..60.0, 0..4),
        weights in proptest::collection::vec(0.01f64..10.0, 1..5),
        width in 200u32..2000,
        height in 200u32..2000
    ) {
        let context = LayoutContext::new(Viewport::new(width, height));
        let mut cache = LayoutCache::new();
        let direction = if vertical { Direction::Vertical } else { Direction::Horizontal };
        let mut layout = LinearLayout::new(direction);

        let mut keys: Vec<LayoutKey> = Vec::new();
        for (index, weight) in weights.iter().enumerate() {
            if let Some(px) = fixed_px.get(index) {
                let provider: Rc<dyn ContentMeasure> = Rc::new(Size::new(*px, *px));
                keys.push(layout.add_fixed_cell([provider]).key());
            }
            keys.push(layout.add_relative_cell(*weight, false).key());
        }

        let root = context.root_area();
        layout.calculate(&context, &mut cache, root).expect("layout pass");

        let total: f64 = keys
            .iter()
            .map(|key| direction.extent(&cache.area(*key).expect("child area")))
            .sum();
        prop_assert!((total - direction.extent(&root)).abs() <= 1e-9);

        // Children are contiguous in registration order.
        let mut cursor = match direction {
            Direction::Horizontal => root.left,
            Direction::Vertical => root.top,
        };
        for key in &keys {
            let area = cache.area(*key).expect("child area");
            let start = match direction {
                Direction::Horizontal => area.left,
                Direction::Vertical => area.top,
            };
            prop_assert!((start - cursor).abs() <= 1e-9);
            cursor = start + direction.extent(&area);
        }
    }

    #[test]
    fn intersection_is_commutative(a in area_strategy(), b in area_strategy()) {
        prop_assert_eq!(a.intersect(&b), b.intersect(&a));
    }

    #[test]
    fn intersection_is_associative(
        a in area_strategy(),
        b in area_strategy(),
        c in area_strategy()
    ) {
        let left_first = a.intersect(&b).intersect(&c);
        let right_first = a.intersect(&b.intersect(&c));
        assert_areas_close(left_first, right_first)?;
    }

    #[test]
    fn intersection_lies_inside_both_operands(a in area_strategy(), b in area_strategy()) {
        let overlap = a.intersect(&b);
        prop_assert!(overlap.width >= 0.0 && overlap.height >= 0.0);
        if !overlap.is_empty() {
            prop_assert!(a.contains(overlap.p0()) && b.contains(overlap.p0()));
            prop_assert!(overlap.right() <= a.right() + 1e-12);
            prop_assert!(overlap.bottom() <= b.bottom() + 1e-12);
        }
    }
}
