//! Simulated asset pipeline: named cache groups in front of a slow
//! "disk", reset together at a reload boundary.
//!
//! Run with `cargo run --example asset_loading`.

use std::collections::HashMap;

use rescache::CacheRegistry;

fn main() {
    // Stand-in for an asset folder.
    let disk: HashMap<&str, &str> = [
        ("player", "prefab:player.bin"),
        ("enemy", "prefab:enemy.bin"),
        ("save", "icon:save.png"),
        ("open", "icon:open.png"),
    ]
    .into();

    let mut assets: CacheRegistry<String> = CacheRegistry::new();
    assets.register("prefabs", 2);
    assets.register("icons", 10);

    let mut disk_reads = 0;

    let mut fetch = |assets: &mut CacheRegistry<String>,
                     group: &str,
                     key: &str,
                     disk_reads: &mut u32| {
        let loaded = assets.get_or_load(group, key, |key| {
            *disk_reads += 1;
            disk.get(key).map(|data| data.to_string())
        });
        match loaded {
            Some(data) => println!("{group}/{key} -> {data}"),
            None => println!("{group}/{key} -> not found"),
        }
    };

    // Cold lookups hit the disk, repeats are served from the cache.
    fetch(&mut assets, "prefabs", "player", &mut disk_reads);
    fetch(&mut assets, "prefabs", "player", &mut disk_reads);
    fetch(&mut assets, "icons", "save", &mut disk_reads);
    println!("disk reads so far: {disk_reads}");

    // The prefab group holds two entries; loading a third evicts the
    // least recently used one.
    fetch(&mut assets, "prefabs", "enemy", &mut disk_reads);
    fetch(&mut assets, "prefabs", "player", &mut disk_reads);
    fetch(&mut assets, "prefabs", "boss", &mut disk_reads); // not on disk

    // Reload boundary: drop every cached asset, keep the group layout.
    assets.reset();
    fetch(&mut assets, "icons", "save", &mut disk_reads);
    println!("disk reads total: {disk_reads}");
}
