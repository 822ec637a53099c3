use std::fmt::Debug;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct LoggingRwLock<T: Debug> {
  inner: RwLock<T>,
  name: String,
  lock_log_output: bool,
  drop_log_output: bool,
}

impl<T: Debug> LoggingRwLock<T> {
  pub fn new(name: &str, data: T) -> Self {
    LoggingRwLock {
      inner: RwLock::new(data),
      name: name.to_string(),
      lock_log_output: false,
      drop_log_output: false,
    }
  }

  pub fn with_lock_log_output(mut self, enabled: bool) -> Self {
    self.lock_log_output = enabled;
    self
  }

  pub fn with_drop_log_output(mut self, enabled: bool) -> Self {
    self.drop_log_output = enabled;
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub async fn write_with_info(
    &self,
    function_name: &'static str,
    module_path: &'static str,
    file: &'static str,
    line: u32,
  ) -> RwLockWriteGuard<'_, T> {
    self.trace("Attempting to write", function_name, module_path, file, line);
    let guard = self.inner.write().await;
    self.trace("Write acquired", function_name, module_path, file, line);
    guard
  }

  pub async fn read_with_info(
    &self,
    function_name: &'static str,
    module_path: &'static str,
    file: &'static str,
    line: u32,
  ) -> RwLockReadGuard<'_, T> {
    self.trace("Attempting to read", function_name, module_path, file, line);
    let guard = self.inner.read().await;
    self.trace("Read acquired", function_name, module_path, file, line);
    guard
  }

  fn trace(&self, what: &str, function_name: &str, module_path: &str, file: &str, line: u32) {
    if self.lock_log_output {
      log::debug!(
        "{}: {} by {}:{} at {}:{}",
        what,
        self.name,
        function_name,
        module_path,
        file,
        line,
      );
    }
  }
}

#[macro_export]
macro_rules! read_lock_with_log {
  ($lock:expr, $fname:expr) => {
    $lock.read_with_info($fname, module_path!(), file!(), line!()).await
  };
}

#[macro_export]
macro_rules! write_lock_with_log {
  ($lock:expr, $fname:expr) => {
    $lock.write_with_info($fname, module_path!(), file!(), line!()).await
  };
}

impl<T: Debug> Debug for LoggingRwLock<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LoggingRwLock").field("name", &self.name).finish()
  }
}

impl<T: Debug> Drop for LoggingRwLock<T> {
  fn drop(&mut self) {
    if self.drop_log_output {
      log::debug!(":::::>>> Dropped RwLock: name = {}", self.name);
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::Arc;

  #[tokio::test]
  async fn test_read_and_write() {
    let lock = LoggingRwLock::new("counter", 0).with_lock_log_output(true);
    {
      let mut guard = write_lock_with_log!(lock, "test_read_and_write");
      *guard += 1;
    }
    let first = read_lock_with_log!(lock, "test_read_and_write");
    let second = read_lock_with_log!(lock, "test_read_and_write");
    assert_eq!((*first, *second), (1, 1));
  }

  #[tokio::test]
  async fn test_writers_are_serialized() {
    let lock = Arc::new(LoggingRwLock::new("counter", 0));
    let handles = (0..8)
      .map(|_| {
        let lock = lock.clone();
        tokio::spawn(async move {
          let mut guard = write_lock_with_log!(lock, "test_writers_are_serialized");
          *guard += 1;
        })
      })
      .collect::<Vec<_>>();
    for handle in handles {
      handle.await.unwrap();
    }
    assert_eq!(*read_lock_with_log!(lock, "test_writers_are_serialized"), 8);
  }
}
