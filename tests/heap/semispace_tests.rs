use minnow::{Heap, HeapConfig, HeapError, HeapObject, SemispaceHeap, Vm};

fn small_config() -> HeapConfig {
    HeapConfig::with_heap_size(4096)
}

#[test]
fn relocation_preserves_values_behind_stable_handles() {
    let mut heap = SemispaceHeap::new(&HeapConfig::default());

    for i in 0..50 {
        heap.alloc(HeapObject::Int(i), &[]).unwrap();
    }
    let five = heap.alloc(HeapObject::Int(5), &[]).unwrap();
    let seven = heap.alloc(HeapObject::Int(7), &[]).unwrap();
    let pair = heap
        .alloc(
            HeapObject::Pair {
                first: Some(five),
                second: Some(seven),
            },
            &[],
        )
        .unwrap();

    let offsets_before = [
        heap.offset_of(five).unwrap(),
        heap.offset_of(seven).unwrap(),
        heap.offset_of(pair).unwrap(),
    ];

    heap.collect(&[pair]);

    // Storage moved: the three survivors are compacted at the base of the
    // flipped space. Handles and logical values are untouched.
    let offsets_after = [
        heap.offset_of(five).unwrap(),
        heap.offset_of(seven).unwrap(),
        heap.offset_of(pair).unwrap(),
    ];
    assert_ne!(offsets_before, offsets_after);
    let mut sorted = offsets_after;
    sorted.sort_unstable();
    assert_eq!(sorted, [0, 1, 2]);

    assert_eq!(heap.int_value(five), Some(5));
    assert_eq!(heap.int_value(seven), Some(7));
    assert_eq!(heap.pair_children(pair), Some((Some(five), Some(seven))));
}

#[test]
fn copying_preserves_shared_identity() {
    let mut heap = SemispaceHeap::new(&HeapConfig::default());
    let shared = heap.alloc(HeapObject::Int(1), &[]).unwrap();
    let left = heap
        .alloc(
            HeapObject::Pair {
                first: Some(shared),
                second: None,
            },
            &[],
        )
        .unwrap();
    let right = heap
        .alloc(
            HeapObject::Pair {
                first: None,
                second: Some(shared),
            },
            &[],
        )
        .unwrap();

    heap.collect(&[left, right]);

    // One copy of the shared child, referenced from both pairs.
    assert_eq!(heap.live_count(), 3);
    assert_eq!(heap.pair_children(left).unwrap().0, Some(shared));
    assert_eq!(heap.pair_children(right).unwrap().1, Some(shared));
}

#[test]
fn self_cycle_copies_once_and_terminates() {
    let mut heap = SemispaceHeap::new(&HeapConfig::default());
    let pair = heap
        .alloc(
            HeapObject::Pair {
                first: None,
                second: None,
            },
            &[],
        )
        .unwrap();
    heap.set_pair_first(pair, Some(pair));

    heap.collect(&[pair]);
    assert_eq!(heap.live_count(), 1);
    assert_eq!(heap.pair_children(pair), Some((Some(pair), None)));
}

#[test]
fn exhaustion_flips_and_reuses_the_idle_space() {
    let mut vm = Vm::semispace(&small_config());
    let capacity = vm.heap().capacity_slots();

    // Fill the active space with garbage.
    for i in 0..capacity {
        vm.allocate_int(i as i64).unwrap();
    }
    assert_eq!(vm.stats().live_count, capacity);

    // Next allocation collects into the idle space and succeeds there.
    let h = vm.allocate_int(-1).unwrap();
    assert_eq!(vm.int_value(h), Some(-1));
    assert_eq!(vm.stats().live_count, 1);
    assert_eq!(vm.stats().total_collections, 1);
}

#[test]
fn oom_after_full_copy_is_typed() {
    let mut vm = Vm::semispace(&small_config());
    let capacity = vm.heap().capacity_slots();
    for i in 0..capacity {
        vm.push_int(i as i64).unwrap();
    }

    assert_eq!(vm.allocate_int(0), Err(HeapError::OutOfMemory));
    // All rooted objects survived the failed attempt's full copy.
    assert_eq!(vm.stats().live_count, capacity);
    for distance in 0..capacity {
        let root = vm.peek_root(distance).unwrap();
        assert_eq!(vm.int_value(root), Some((capacity - 1 - distance) as i64));
    }
}

#[test]
fn deep_list_survives_breadth_first_copy() {
    let mut vm = Vm::semispace(&HeapConfig::default());

    // Build the list (0 . (1 . (2 . ... (999 . nil)))) from the tail up,
    // rooting only the head cell. 2000 objects fit the default heap, so no
    // collection runs mid-build.
    let mut tail = None;
    for i in (0..1000).rev() {
        let head = vm.allocate_int(i).unwrap();
        let cell = vm.allocate_pair(Some(head), tail).unwrap();
        tail = Some(cell);
    }
    vm.push_root(tail.unwrap());

    vm.collect();
    assert_eq!(vm.stats().live_count, 2000);

    // Walk the relocated list and check every element.
    let mut cursor = Some(vm.peek_root(0).unwrap());
    let mut expected = 0i64;
    while let Some(cell) = cursor {
        let (head, next) = vm.pair_children(cell).unwrap();
        assert_eq!(vm.int_value(head.unwrap()), Some(expected));
        expected += 1;
        cursor = next;
    }
    assert_eq!(expected, 1000);
}
