#![allow(dead_code)]

use std::{fs, path::{Path, PathBuf}};

use crypto_acb::util::rw::DescribedReader;

fn test_temp_dir_path() -> PathBuf {
    let tmpdir = std::env::temp_dir();
    (1..1000000)
        .map(|val| tmpdir.join(format!("crypto-acb-test-{}-{}", std::process::id(), val)))
        .find(|path| !path.exists())
        .expect("Could not find a temp directory path that does not already exist")
}

/// A unique temp directory path, removed (with its contents) on drop.
/// The directory itself is not created.
pub struct NonAutoCreatingTestDir {
    pub path: PathBuf,
}

impl NonAutoCreatingTestDir {
    pub fn new() -> NonAutoCreatingTestDir {
        NonAutoCreatingTestDir { path: test_temp_dir_path() }
    }
}

fn cleanup_test_dir(path: &Path) {
    if !path.exists() {
        println!("cleanup_test_dir: {} did not exist", path.display());
        return;
    }
    let skip_env_var = "SKIP_TEMP_DIR_CLEANUP_ON_FAIL";
    let skip_del_on_fail = crypto_acb::util::sys::env_var_non_empty(skip_env_var);

    if std::thread::panicking() && skip_del_on_fail {
        println!("cleanup_test_dir: panicking. Skipping remove of {}", path.display());
    } else {
        println!("cleanup_test_dir: removing {}. To skip cleanup, set {}",
                 path.display(), skip_env_var);
        let _ = fs::remove_dir_all(path);
    }
}

impl Drop for NonAutoCreatingTestDir {
    fn drop(&mut self) {
        cleanup_test_dir(&self.path);
    }
}

pub const GENERIC_HEADER: &str = "type,major,minor,amount,rate,value,total,datetime";
pub const BITSO_HEADER: &str = "type,major,minor,amount,rate,value,fee,total,timestamp,datetime";

pub fn csv_reader(desc: &str, header: &str, rows: &[&str]) -> DescribedReader {
    let mut data = header.to_string() + "\n";
    for row in rows {
        data += row;
        data += "\n";
    }
    DescribedReader::from_string(desc.to_string(), data)
}
