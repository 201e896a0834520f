// -- 用户资源相关的处理函数
pub mod user;
