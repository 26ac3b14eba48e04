/*!
 * Poolbank - Demo Entry Point
 *
 * Walks through the allocator on static storage:
 * - Forward-scan fragmentation on a 10-slot pool
 * - Reallocation through the data bank
 * - A mixed-width linked list
 * - Queue and stack buffers carved from a pool
 */

use miette::{IntoDiagnostic, Result};
use tracing::{info, instrument};

use poolbank::list::DefaultNodeStorage;
use poolbank::{
    init_tracing, pool_storage, span_operation, Buffer, BufferKind, DataBank, DataBankConfig,
    LinkedList, ListArena, MemoryError, MemoryPool, NODE_WIDTH,
};

const BANK: DataBankConfig = DataBankConfig::DEFAULT;

fn main() -> Result<()> {
    init_tracing();

    info!("Poolbank demo starting...");
    info!("================================================");

    fragmentation_demo()?;

    let mut bank_data = [0u8; BANK.data_bytes()];
    let mut bank_cells = [0u8; BANK.occupancy_cells()];
    let mut bank = DataBank::new(BANK, &mut bank_data, &mut bank_cells)?;
    bank_demo(&mut bank)?;
    bank.reset();

    let mut node_storage = DefaultNodeStorage::new();
    let (node_data, node_cells) = node_storage.parts();
    let nodes = MemoryPool::new(
        poolbank::core::limits::DEFAULT_LIST_NODE_CAPACITY,
        NODE_WIDTH,
        node_data,
        node_cells,
    )?;
    let mut arena = ListArena::new(nodes, bank)?;
    list_demo(&mut arena)?;

    buffer_demo()?;

    let stats = serde_json::to_string_pretty(&arena.bank().stats()).into_diagnostic()?;
    info!("Final bank statistics:\n{}", stats);
    info!("================================================");
    info!("Poolbank demo finished");
    Ok(())
}

#[instrument]
fn fragmentation_demo() -> Result<()> {
    let _span = span_operation("fragmentation_demo");
    let mut storage = pool_storage!(10, 1);
    let mut pool = storage.pool(10, 1)?;

    let mut a = Some(pool.allocate(4)?);
    let _b = pool.allocate(3)?;
    pool.free(&mut a, 4);

    info!(
        free = pool.free_slots(),
        cursor = pool.scan_cursor(),
        state = %pool.check_fragmentation(),
        largest_run = pool.max_contiguous_free_space(),
        "Pool after freeing the first run"
    );

    match pool.allocate(5) {
        Err(err @ MemoryError::NoContiguousRun { .. }) => {
            info!(error = %err, "Five-slot request rejected as expected")
        }
        Err(err) => return Err(err.into()),
        Ok(address) => info!(address, "Five-slot request unexpectedly succeeded"),
    }
    Ok(())
}

#[instrument(skip(bank))]
fn bank_demo(bank: &mut DataBank<'_>) -> Result<()> {
    let _span = span_operation("bank_demo");
    let address = bank.allocate_zeroed(4, 3)?;
    if let Some(bytes) = bank.bytes_mut(4, address, 3) {
        for (i, chunk) in bytes.chunks_exact_mut(4).enumerate() {
            chunk.copy_from_slice(&(i as u32 * 100).to_le_bytes());
        }
    }
    let mut words = Some(address);

    let grown = bank.reallocate(4, &mut words, 3, 6)?;
    info!(
        address = grown,
        free = bank.free_slots(4)?,
        state = %bank.check_fragmentation(4)?,
        "Grew a 4-byte array from 3 to 6 elements"
    );
    bank.free(4, &mut words, 6);
    Ok(())
}

#[instrument(skip(arena))]
fn list_demo(arena: &mut ListArena<'_>) -> Result<()> {
    let _span = span_operation("list_demo");
    let mut list = LinkedList::untyped();
    list.insert_value(arena, 7u8, 0)?;
    list.insert_value(arena, 1234u16, 1)?;
    list.insert_value(arena, 2.5f64, 2)?;
    list.insert(arena, b"abc", 1)?;

    for (position, bytes) in list.iter(arena).enumerate() {
        info!(position, width = bytes.len(), ?bytes, "List element");
    }
    info!(
        len = list.len(),
        free_nodes = arena.free_nodes(),
        "Untyped list built"
    );
    list.clear(arena)?;
    Ok(())
}

#[instrument]
fn buffer_demo() -> Result<()> {
    let _span = span_operation("buffer_demo");
    let mut storage = pool_storage!(8, 2);
    let mut pool = storage.pool(8, 2)?;
    let region = pool.allocate_zeroed(4)?;

    let bytes = pool
        .bytes_mut(region, 4)
        .ok_or(MemoryError::InvalidAddress(region))?;
    let mut queue = Buffer::new(BufferKind::Queue, 2, 4, bytes)?;
    for value in 1..=5u16 {
        queue.push_value(value);
    }
    let mut drained = Vec::new();
    while let Some(value) = queue.pop_value::<u16>() {
        drained.push(value);
    }
    info!(?drained, "Queue drained after overflowing by one");

    let mut stack_storage = [0u8; 8];
    let mut stack = Buffer::for_element::<u16>(BufferKind::Stack, 4, &mut stack_storage)?;
    stack.push_value(10u16);
    stack.push_value(20u16);
    info!(top = ?stack.pop_value::<u16>(), pending = stack.pending(), "Stack popped");
    Ok(())
}
