use clap::Parser;
use lean_hash::HashMap;
use lean_hash::Tier;
use lean_hash::TieredSet;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "elements", default_value_t = 1000)]
    elements: usize,

    /// Also fill a map presized for the same element count.
    #[arg(long = "presize", default_value_t = false)]
    presize: bool,
}

fn main() {
    let args = Args::parse();

    println!("Filling TieredSet with {} u64 values...", args.elements);

    let mut set: TieredSet<u64> = TieredSet::new();
    let mut tier = set.tier();
    println!("{:>8} elements: {:?}", set.len(), tier);

    for i in 0..args.elements {
        set = set.add(i as u64);
        if set.tier() != tier {
            tier = set.tier();
            println!("{:>8} elements: {:?}", set.len(), tier);
        }
    }

    if tier != Tier::Table {
        println!("Set never left the inline tiers; no table to inspect");
        return;
    }

    match set.table_mut() {
        Ok(table) => {
            println!(
                "Final load factor: {:.2}%",
                (table.len() as f64 / table.capacity() as f64) * 100.0
            );
            table.probe_histogram().print();
            table.debug_stats().print();
        }
        Err(err) => println!("Table is not writable: {err}"),
    }

    if args.presize {
        let mut map: HashMap<u64, u64> = HashMap::with_capacity(args.elements);
        let initial = map.capacity();
        for i in 0..args.elements {
            map.insert(i as u64, i as u64 * 2);
        }
        println!(
            "Presized map: capacity {} before, {} after {} inserts",
            initial,
            map.capacity(),
            map.len()
        );
        map.debug_stats().print();
    }
}
