use crate::utils::error::Result;

/// 快照檔的存放位置 (本機磁碟或記憶體)
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn bind_addr(&self) -> &str;
    fn data_dir(&self) -> &str;
    fn snapshot_file(&self) -> &str;
}
