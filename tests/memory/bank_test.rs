/*!
 * Data Bank Tests
 * Width-class dispatch and delegated pool operations
 */

use poolbank::{DataBank, DataBankConfig, FragmentationState, MemoryError, WidthClass};
use pretty_assertions::assert_eq;

const SMALL: DataBankConfig = DataBankConfig::with_capacities([4, 4, 8, 2]);

#[test]
fn test_each_size_lands_in_its_class() {
    let mut data = [0u8; SMALL.data_bytes()];
    let mut cells = [0u8; SMALL.occupancy_cells()];
    let mut bank = DataBank::new(SMALL, &mut data, &mut cells).unwrap();

    for (size, width) in [(1, 1), (2, 2), (3, 4), (4, 4), (5, 8), (7, 8), (8, 8)] {
        assert_eq!(bank.pool(size).unwrap().element_size(), width, "size {}", size);
    }

    bank.allocate(1, 1).unwrap();
    bank.allocate(2, 2).unwrap();
    bank.allocate(3, 3).unwrap();
    bank.allocate(6, 1).unwrap();

    let free: Vec<usize> = bank.stats().iter().map(|s| s.free_slots).collect();
    assert_eq!(free, vec![3, 2, 5, 1]);
}

#[test]
fn test_unrecognized_sizes() {
    let mut data = [0u8; SMALL.data_bytes()];
    let mut cells = [0u8; SMALL.occupancy_cells()];
    let mut bank = DataBank::new(SMALL, &mut data, &mut cells).unwrap();

    assert_eq!(bank.allocate(9, 1).unwrap_err(), MemoryError::UnrecognizedSize(9));
    assert_eq!(
        bank.check_fragmentation(0).unwrap_err(),
        MemoryError::UnrecognizedSize(0)
    );
    assert_eq!(
        bank.max_contiguous_free_space(64).unwrap_err(),
        MemoryError::UnrecognizedSize(64)
    );
    assert!(bank.bytes(9, 0, 1).is_none());
}

#[test]
fn test_fragmentation_is_per_class() {
    let mut data = [0u8; SMALL.data_bytes()];
    let mut cells = [0u8; SMALL.occupancy_cells()];
    let mut bank = DataBank::new(SMALL, &mut data, &mut cells).unwrap();

    let mut first = Some(bank.allocate(4, 2).unwrap());
    bank.allocate(4, 2).unwrap();
    bank.free(4, &mut first, 2);
    bank.allocate(1, 2).unwrap();

    assert_eq!(bank.check_fragmentation(4).unwrap(), FragmentationState::Fragmented);
    assert_eq!(bank.max_contiguous_free_space(4).unwrap(), 4);
    assert_eq!(bank.check_fragmentation(1).unwrap(), FragmentationState::Unfragmented);
    assert_eq!(bank.max_contiguous_free_space(1).unwrap(), 2);
}

#[test]
fn test_reallocate_through_the_bank() {
    let mut data = [0u8; SMALL.data_bytes()];
    let mut cells = [0u8; SMALL.occupancy_cells()];
    let mut bank = DataBank::new(SMALL, &mut data, &mut cells).unwrap();

    let address = bank.allocate(2, 2).unwrap();
    bank.bytes_mut(2, address, 2)
        .unwrap()
        .copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);
    let mut handle = Some(address);

    // Only two free slots remain in the 2-byte class
    assert!(matches!(
        bank.reallocate(2, &mut handle, 2, 3),
        Err(MemoryError::OutOfSlots { requested: 3, free: 2 })
    ));
    assert_eq!(handle, Some(address));

    let shrunk = bank.reallocate(2, &mut handle, 2, 1).unwrap();
    assert_eq!(bank.bytes(2, shrunk, 1).unwrap(), &[0x11, 0x22]);
    assert_eq!(bank.free_slots(2).unwrap(), 3);
}

#[test]
fn test_json_config_drives_layout() {
    let json = r#"{"classes":[
        {"width":1,"capacity":16},
        {"width":3,"capacity":4},
        {"width":6,"capacity":4},
        {"width":12,"capacity":2}
    ]}"#;
    let config = DataBankConfig::from_json(json).unwrap();
    assert_eq!(config.classes[1], WidthClass::new(3, 4));

    let mut data = vec![0u8; config.data_bytes()];
    let mut cells = vec![0u8; config.occupancy_cells()];
    let mut bank = DataBank::new(config, &mut data, &mut cells).unwrap();

    assert_eq!(bank.pool(2).unwrap().element_size(), 3);
    assert_eq!(bank.pool(10).unwrap().element_size(), 12);
    assert_eq!(bank.allocate(13, 1).unwrap_err(), MemoryError::UnrecognizedSize(13));
}

#[test]
fn test_default_config_matches_limits() {
    let config = DataBankConfig::default();
    let widths: Vec<usize> = config.classes.iter().map(|c| c.width).collect();
    assert_eq!(widths, vec![1, 2, 4, 8]);
    assert!(config.classes.iter().all(|c| c.capacity == 100));
}
